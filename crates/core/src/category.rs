//! Grocery category classification.
//!
//! Products are filed under a category the first time they are added to a
//! list. The classifier is a static keyword table: a product name is split
//! into lowercase words and every keyword is checked as a word prefix (so
//! "apples" hits `apple` but "steak" does not hit `tea`). The longest matching
//! keyword wins, which lets "peanut butter" land in Pantry rather than Dairy.
//! Ties go to the category listed first.

/// Every category the classifier can produce, in display order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Produce",
    "Dairy & Eggs",
    "Meat & Fish",
    "Bakery",
    "Pantry",
    "Frozen",
    "Beverages",
    "Snacks & Sweets",
    "Household",
    "Personal Care",
    "Baby",
    "Pet",
];

/// Keyword table. Order matters only for equal-length ties.
const RULES: &[(&str, &[&str])] = &[
    (
        "Frozen",
        &["frozen", "ice cream", "gelato", "popsicle", "fish sticks", "frozen pizza"],
    ),
    (
        "Beverages",
        &[
            "water", "juice", "soda", "cola", "lemonade", "coffee", "tea", "beer", "wine",
            "sparkling", "kombucha", "smoothie", "energy drink",
        ],
    ),
    (
        "Snacks & Sweets",
        &[
            "chip", "crisps", "chocolate", "candy", "cookie", "biscuit", "cracker", "popcorn",
            "pretzel", "gummy", "nuts", "granola bar",
        ],
    ),
    (
        "Dairy & Eggs",
        &[
            "milk", "cheese", "yogurt", "yoghurt", "butter", "cream", "egg", "kefir", "cottage",
            "mozzarella", "parmesan", "cheddar", "sour cream",
        ],
    ),
    (
        "Meat & Fish",
        &[
            "chicken", "beef", "pork", "lamb", "turkey", "ham", "bacon", "sausage", "mince",
            "steak", "salmon", "tuna", "cod", "shrimp", "prawn", "fish",
        ],
    ),
    (
        "Bakery",
        &[
            "bread", "baguette", "bagel", "croissant", "bun", "roll", "muffin", "tortilla",
            "pita", "cake",
        ],
    ),
    (
        "Produce",
        &[
            "apple", "banana", "orange", "lemon", "lime", "grape", "berry", "strawberr",
            "blueberr", "pear", "peach", "melon", "avocado", "tomato", "potato", "onion",
            "garlic", "carrot", "lettuce", "spinach", "cucumber", "pepper", "broccoli",
            "zucchini", "mushroom", "cabbage", "celery", "herb", "basil", "parsley",
        ],
    ),
    (
        "Pantry",
        &[
            "rice", "pasta", "spaghetti", "noodle", "flour", "sugar", "salt", "oil", "vinegar",
            "sauce", "ketchup", "mustard", "mayo", "cereal", "oat", "bean", "lentil", "honey",
            "jam", "peanut butter", "spice", "stock", "canned", "soup", "coconut milk",
        ],
    ),
    (
        "Household",
        &[
            "detergent", "soap", "dish", "sponge", "paper towel", "toilet paper", "tissue",
            "trash bag", "bin bag", "foil", "cling film", "bleach", "cleaner", "battery",
            "light bulb",
        ],
    ),
    (
        "Personal Care",
        &[
            "shampoo", "conditioner", "toothpaste", "toothbrush", "deodorant", "razor",
            "lotion", "sunscreen", "floss", "body wash",
        ],
    ),
    ("Baby", &["diaper", "nappy", "nappies", "baby", "formula", "wipes"]),
    (
        "Pet",
        &["dog food", "cat food", "kibble", "cat litter", "litter", "pet", "dog treat"],
    ),
];

/// Classify a product name into one of [`DEFAULT_CATEGORIES`].
///
/// Returns `None` when no keyword matches.
///
/// ```
/// use basket_core::category::classify;
///
/// assert_eq!(classify("Granny Smith apples"), Some("Produce"));
/// assert_eq!(classify("Apple juice 1L"), Some("Beverages"));
/// assert_eq!(classify("Crunchy peanut butter"), Some("Pantry"));
/// assert_eq!(classify("Birthday candles"), None);
/// ```
#[must_use]
pub fn classify(product_name: &str) -> Option<&'static str> {
    let haystack = normalize(product_name);
    if haystack.trim().is_empty() {
        return None;
    }

    let mut best: Option<(&'static str, usize)> = None;
    for &(category, keywords) in RULES {
        for keyword in keywords {
            let needle = format!(" {keyword}");
            if haystack.contains(&needle) && best.is_none_or(|(_, len)| keyword.len() > len) {
                best = Some((category, keyword.len()));
            }
        }
    }
    best.map(|(category, _)| category)
}

/// Lowercase, replace punctuation with spaces and collapse runs of spaces.
///
/// The result starts with a space so every word is preceded by one.
fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    for word in name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        out.push(' ');
        out.push_str(&word.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_targets_a_default_category() {
        for (category, _) in RULES {
            assert!(
                DEFAULT_CATEGORIES.contains(category),
                "{category} missing from DEFAULT_CATEGORIES"
            );
        }
    }

    #[test]
    fn test_prefix_matching_covers_plurals() {
        assert_eq!(classify("bananas"), Some("Produce"));
        assert_eq!(classify("Eggs (free range)"), Some("Dairy & Eggs"));
        assert_eq!(classify("strawberries"), Some("Produce"));
    }

    #[test]
    fn test_no_match_inside_words() {
        // "steak" must not hit the "tea" keyword.
        assert_eq!(classify("steak"), Some("Meat & Fish"));
        assert_eq!(classify("hotpot"), None);
    }

    #[test]
    fn test_longest_keyword_wins() {
        assert_eq!(classify("vanilla ice cream"), Some("Frozen"));
        assert_eq!(classify("coconut milk"), Some("Pantry"));
        assert_eq!(classify("sour cream"), Some("Dairy & Eggs"));
    }

    #[test]
    fn test_tie_goes_to_earlier_category() {
        assert_eq!(classify("lemon juice"), Some("Beverages"));
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(classify("TOILET-PAPER x12"), Some("Household"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(classify("gift card"), None);
    }
}
