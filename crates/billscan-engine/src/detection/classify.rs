use crate::detection::normalize::classification_haystack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerchantKind {
    Bill,
    Retail,
    Unknown,
}

impl MerchantKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bill => "bill",
            Self::Retail => "retail",
            Self::Unknown => "unknown",
        }
    }
}

/// Stateless classification of a payee, derived purely from the merchant
/// string and transaction description.
#[derive(Debug, Clone)]
pub struct MerchantClassification {
    pub kind: MerchantKind,
    pub category: String,
    pub confidence: f64,
    pub requires_amount_consistency: bool,
    /// Relative amount spread tolerated when clustering this merchant.
    pub amount_tolerance: f64,
    /// Confidence floor a detected bill must clear for this merchant.
    pub min_acceptance: f64,
}

impl MerchantClassification {
    pub fn should_exclude_from_bills(&self) -> bool {
        self.kind == MerchantKind::Retail
    }
}

/// Grocers, restaurants, general retail, and fuel: never bills, however
/// regular the spending looks. The acceptance floor of 1.0 makes the
/// exclusion hold even if one of these slips past the caller-side filter.
const RETAIL_MARKERS: &[&str] = &[
    "tesco",
    "sainsbury",
    "asda",
    "morrisons",
    "aldi",
    "lidl",
    "waitrose",
    "co op",
    "iceland foods",
    "marks spencer",
    "mcdonald",
    "burger king",
    "kfc",
    "greggs",
    "nando",
    "pizza hut",
    "dominos",
    "starbucks",
    "costa coffee",
    "pret a manger",
    "deliveroo",
    "just eat",
    "uber eats",
    "restaurant",
    "takeaway",
    "amazon marketplace",
    "amzn mktp",
    "ebay",
    "argos",
    "john lewis",
    "primark",
    "ikea",
    "zara",
    "hm store",
    "next retail",
    "tk maxx",
    "sports direct",
    "shell",
    "esso",
    "texaco",
    "bp connect",
    "petrol",
    "fuel station",
];

/// Named utilities, telecoms, insurers, subscription brands, gyms, and
/// financial/housing/transport terms that strongly indicate a bill.
const BILL_MARKERS: &[&str] = &[
    "british gas",
    "edf energy",
    "eon",
    "octopus energy",
    "ovo energy",
    "scottish power",
    "bulb energy",
    "shell energy",
    "thames water",
    "severn trent",
    "anglian water",
    "united utilities",
    "yorkshire water",
    "council tax",
    "tv licence",
    "vodafone",
    "o2",
    "ee limited",
    "three",
    "giffgaff",
    "bt group",
    "virgin media",
    "sky digital",
    "talktalk",
    "plusnet",
    "broadband",
    "netflix",
    "spotify",
    "disney plus",
    "amazon prime",
    "prime video",
    "youtube premium",
    "apple com bill",
    "audible",
    "now tv",
    "paramount plus",
    "playstation network",
    "xbox game pass",
    "puregym",
    "the gym group",
    "david lloyd",
    "nuffield health",
    "gym membership",
    "aviva",
    "axa",
    "admiral insurance",
    "direct line",
    "churchill insurance",
    "hastings direct",
    "vitality",
    "insurance",
    "mortgage",
    "rent",
    "landlord",
    "lettings",
    "car finance",
    "vehicle leasing",
    "season ticket",
    "tfl travel",
    "loan repayment",
    "pension contribution",
];

/// Payment-method phrases from the description that mark a bill even when the
/// merchant name is unrecognized.
const PAYMENT_METHOD_MARKERS: &[&str] = &[
    "direct debit",
    "standing order",
    "recurring payment",
    "recurring card payment",
    "membership",
    "subscription",
    "monthly premium",
    "autopay",
    "instalment",
    "installment",
];

/// Ordered category table; first matching category wins.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    (
        "Utilities",
        &[
            "gas", "electric", "energy", "power", "water", "sewerage", "council tax",
            "tv licence", "broadband", "internet", "mobile", "phone", "telecom", "vodafone",
            "o2", "giffgaff", "talktalk", "plusnet", "virgin media", "sky digital",
        ],
    ),
    (
        "Subscriptions",
        &[
            "netflix", "spotify", "disney", "prime", "youtube", "audible", "now tv",
            "paramount", "playstation", "xbox", "apple com bill", "subscription",
            "membership", "gym", "fitness", "magazine", "patreon",
        ],
    ),
    (
        "Insurance",
        &[
            "insurance", "insure", "aviva", "axa", "admiral", "direct line", "churchill",
            "hastings", "vitality", "premium", "cover",
        ],
    ),
    (
        "Housing",
        &["rent", "mortgage", "landlord", "lettings", "housing", "service charge"],
    ),
    (
        "Transportation",
        &[
            "tfl", "rail", "train", "season ticket", "transport", "car finance", "leasing",
            "parking permit",
        ],
    ),
    (
        "Financial",
        &["loan", "finance", "credit", "overdraft", "pension", "savings plan"],
    ),
    (
        "Health",
        &["health", "dental", "dentist", "optical", "clinic", "bupa", "physio"],
    ),
];

const CATEGORY_OTHER: &str = "Other";

/// First matching category from the ordered keyword table, else "Other".
pub fn assign_category(merchant: &str, description: &str) -> String {
    let haystack = combined_haystack(merchant, description);
    for (category, keywords) in CATEGORY_RULES {
        if keywords.iter().any(|keyword| haystack.contains(keyword)) {
            return (*category).to_string();
        }
    }
    CATEGORY_OTHER.to_string()
}

/// Rule-table classification, three ordered tiers with first match winning.
///
/// Every tier is checked against the merchant haystack alone and against the
/// merchant+description haystack, so a bare merchant string and a merchant
/// buried in statement text classify the same way.
pub fn classify_merchant(merchant: &str, description: &str) -> MerchantClassification {
    let merchant_haystack = classification_haystack(merchant);
    let full_haystack = combined_haystack(merchant, description);

    if matches_any(RETAIL_MARKERS, &merchant_haystack, &full_haystack) {
        return MerchantClassification {
            kind: MerchantKind::Retail,
            category: "Retail".to_string(),
            confidence: 0.9,
            requires_amount_consistency: false,
            amount_tolerance: f64::INFINITY,
            min_acceptance: 1.0,
        };
    }

    if matches_any(BILL_MARKERS, &merchant_haystack, &full_haystack) {
        return MerchantClassification {
            kind: MerchantKind::Bill,
            category: assign_category(merchant, description),
            confidence: 0.8,
            requires_amount_consistency: true,
            amount_tolerance: 0.05,
            min_acceptance: 0.4,
        };
    }

    if matches_any(PAYMENT_METHOD_MARKERS, &merchant_haystack, &full_haystack) {
        return MerchantClassification {
            kind: MerchantKind::Bill,
            category: assign_category(merchant, description),
            confidence: 0.7,
            requires_amount_consistency: true,
            amount_tolerance: 0.05,
            min_acceptance: 0.4,
        };
    }

    MerchantClassification {
        kind: MerchantKind::Unknown,
        category: CATEGORY_OTHER.to_string(),
        confidence: 0.3,
        requires_amount_consistency: true,
        amount_tolerance: 0.03,
        min_acceptance: 0.7,
    }
}

fn matches_any(markers: &[&str], merchant_haystack: &str, full_haystack: &str) -> bool {
    markers
        .iter()
        .any(|marker| merchant_haystack.contains(marker) || full_haystack.contains(marker))
}

fn combined_haystack(merchant: &str, description: &str) -> String {
    classification_haystack(&format!("{merchant} {description}"))
}
