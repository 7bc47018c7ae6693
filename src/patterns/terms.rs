//! Bilingual (English / German) term catalogs.
//!
//! All terms are lowercase; callers match against lowercased text.

use super::TermSet;

// ============================================================================
// Table categories
// ============================================================================

pub const INCOME_STATEMENT: TermSet = TermSet {
    english: &[
        "income statement",
        "profit and loss",
        "revenue",
        "sales",
        "turnover",
        "cost of sales",
        "gross profit",
        "operating income",
        "operating profit",
        "net income",
        "net profit",
        "ebitda",
        "ebit",
        "earnings per share",
    ],
    german: &[
        "gewinn- und verlustrechnung",
        "umsatzerlöse",
        "umsatz",
        "erlöse",
        "umsatzkosten",
        "bruttoergebnis",
        "betriebsergebnis",
        "jahresüberschuss",
        "konzernergebnis",
        "ergebnis je aktie",
    ],
};

pub const BALANCE_SHEET: TermSet = TermSet {
    english: &[
        "balance sheet",
        "total assets",
        "assets",
        "liabilities",
        "equity",
        "current assets",
        "non-current assets",
        "receivables",
        "inventories",
        "borrowings",
    ],
    german: &[
        "bilanz",
        "bilanzsumme",
        "aktiva",
        "passiva",
        "vermögenswerte",
        "verbindlichkeiten",
        "eigenkapital",
        "umlaufvermögen",
        "anlagevermögen",
        "rückstellungen",
    ],
};

pub const CASH_FLOW: TermSet = TermSet {
    english: &[
        "cash flow",
        "operating activities",
        "investing activities",
        "financing activities",
        "capital expenditure",
        "capex",
        "free cash flow",
        "dividends paid",
        "net cash",
    ],
    german: &[
        "kapitalflussrechnung",
        "cashflow",
        "geschäftstätigkeit",
        "investitionstätigkeit",
        "finanzierungstätigkeit",
        "mittelzufluss",
        "mittelabfluss",
        "zahlungsmittel",
    ],
};

pub const RATIOS: TermSet = TermSet {
    english: &[
        "ratio",
        "margin",
        "return on equity",
        "return on assets",
        "roe",
        "roa",
        "p/e",
        "price/earnings",
        "dividend yield",
        "leverage",
    ],
    german: &[
        "kennzahl",
        "kennzahlen",
        "quote",
        "marge",
        "eigenkapitalrendite",
        "gesamtkapitalrendite",
        "kgv",
        "dividendenrendite",
        "verschuldungsgrad",
    ],
};

pub const INVESTMENT_PORTFOLIO: TermSet = TermSet {
    english: &[
        "isin",
        "portfolio",
        "holding",
        "position",
        "shares",
        "units",
        "quantity",
        "market value",
        "weight",
        "allocation",
        "security",
        "nominal",
    ],
    german: &[
        "depot",
        "wertpapier",
        "stück",
        "anteile",
        "bestand",
        "kurswert",
        "marktwert",
        "gewichtung",
        "anteil",
    ],
};

// ============================================================================
// Line items (key, terms); the longest matching term decides a row's item
// ============================================================================

pub const INCOME_LINE_ITEMS: &[(&str, TermSet)] = &[
    (
        "revenue",
        TermSet {
            english: &["total revenue", "revenues", "revenue", "net sales", "sales", "turnover"],
            german: &["umsatzerlöse", "umsatz", "erlöse", "gesamtleistung"],
        },
    ),
    (
        "cost_of_revenue",
        TermSet {
            english: &["cost of revenue", "cost of sales", "cost of goods sold", "cogs"],
            german: &["umsatzkosten", "herstellungskosten", "materialaufwand"],
        },
    ),
    (
        "gross_profit",
        TermSet {
            english: &["gross profit", "gross income"],
            german: &["bruttoergebnis", "rohertrag", "bruttogewinn"],
        },
    ),
    (
        "operating_income",
        TermSet {
            english: &["operating income", "operating profit", "ebit"],
            german: &["betriebsergebnis", "operatives ergebnis"],
        },
    ),
    (
        "net_income",
        TermSet {
            english: &["net income", "net profit", "net earnings", "profit for the year"],
            german: &["jahresüberschuss", "nettogewinn", "konzernergebnis", "periodenergebnis"],
        },
    ),
];

pub const BALANCE_LINE_ITEMS: &[(&str, TermSet)] = &[
    (
        "total_assets",
        TermSet {
            english: &["total assets"],
            german: &["summe aktiva", "bilanzsumme", "summe vermögenswerte", "gesamtvermögen"],
        },
    ),
    (
        "current_assets",
        TermSet {
            english: &["current assets", "total current assets"],
            german: &["umlaufvermögen", "kurzfristige vermögenswerte"],
        },
    ),
    (
        "cash",
        TermSet {
            english: &["cash and cash equivalents", "cash and equivalents", "cash"],
            german: &["liquide mittel", "zahlungsmittel", "kassenbestand"],
        },
    ),
    (
        "total_liabilities",
        TermSet {
            english: &["total liabilities"],
            german: &["summe verbindlichkeiten", "verbindlichkeiten gesamt", "fremdkapital"],
        },
    ),
    (
        "current_liabilities",
        TermSet {
            english: &["current liabilities", "total current liabilities"],
            german: &["kurzfristige verbindlichkeiten"],
        },
    ),
    (
        "total_debt",
        TermSet {
            english: &["total debt", "borrowings", "debt"],
            german: &["finanzverbindlichkeiten", "finanzschulden"],
        },
    ),
    (
        "equity",
        TermSet {
            english: &["total equity", "shareholders' equity", "stockholders' equity", "equity"],
            german: &["eigenkapital"],
        },
    ),
];

pub const CASH_FLOW_LINE_ITEMS: &[(&str, TermSet)] = &[
    (
        "operating_cash_flow",
        TermSet {
            english: &[
                "net cash from operating activities",
                "cash from operating activities",
                "operating activities",
                "operating cash flow",
            ],
            german: &[
                "cashflow aus laufender geschäftstätigkeit",
                "laufender geschäftstätigkeit",
                "operativer cashflow",
            ],
        },
    ),
    (
        "investing_cash_flow",
        TermSet {
            english: &["investing activities"],
            german: &["investitionstätigkeit"],
        },
    ),
    (
        "financing_cash_flow",
        TermSet {
            english: &["financing activities"],
            german: &["finanzierungstätigkeit"],
        },
    ),
    (
        "capital_expenditure",
        TermSet {
            english: &[
                "capital expenditure",
                "capital expenditures",
                "capex",
                "purchase of property, plant and equipment",
            ],
            german: &["investitionen in sachanlagen", "sachanlageinvestitionen"],
        },
    ),
    (
        "free_cash_flow",
        TermSet {
            english: &["free cash flow"],
            german: &["freier cashflow", "free cashflow"],
        },
    ),
];

// ============================================================================
// Portfolio table columns
// ============================================================================

pub const COLUMN_NAME: TermSet = TermSet {
    english: &["name", "security", "description", "instrument", "holding"],
    german: &["bezeichnung", "wertpapier", "titel", "gattung"],
};

pub const COLUMN_ISIN: TermSet = TermSet {
    english: &["isin"],
    german: &["isin"],
};

pub const COLUMN_QUANTITY: TermSet = TermSet {
    english: &["quantity", "qty", "shares", "units", "nominal"],
    german: &["stück", "stk", "anzahl", "anteile", "bestand"],
};

pub const COLUMN_PRICE: TermSet = TermSet {
    english: &["price", "rate", "nav"],
    german: &["kurs", "preis"],
};

pub const COLUMN_VALUE: TermSet = TermSet {
    english: &["market value", "value", "amount"],
    german: &["kurswert", "marktwert", "wert", "betrag"],
};

pub const COLUMN_WEIGHT: TermSet = TermSet {
    english: &["weight", "allocation", "%"],
    german: &["gewichtung", "anteil"],
};

// ============================================================================
// Security proximity terms
// ============================================================================

pub const QUANTITY_TERMS: TermSet = TermSet {
    english: &[
        "shares", "units", "volume", "holding", "holdings", "balance", "quantity", "qty", "nominal",
    ],
    german: &["stück", "stk", "anteile", "bestand"],
};

pub const PRICE_TERMS: TermSet = TermSet {
    english: &["price", "rate", "value", "cost", "nav"],
    german: &["kurs", "preis", "wert"],
};

// ============================================================================
// Currencies
// ============================================================================

pub const CURRENCY_CODES: &[&str] = &[
    "USD", "EUR", "GBP", "CHF", "JPY", "CAD", "AUD", "SEK", "NOK", "DKK", "HKD", "SGD", "CNY",
    "NZD", "PLN", "CZK", "HUF", "ZAR",
];

pub const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₣", "CHF"),
];

pub const CURRENCY_NAMES: TermSet = TermSet {
    english: &[
        "us dollar",
        "euro",
        "swiss franc",
        "british pound",
        "pound sterling",
        "japanese yen",
        "canadian dollar",
        "australian dollar",
    ],
    german: &[
        "us-dollar",
        "schweizer franken",
        "britisches pfund",
        "japanischer yen",
        "kanadischer dollar",
        "australischer dollar",
    ],
};

// ============================================================================
// Financial sections
// ============================================================================

pub const ASSET_ALLOCATION_HEADERS: TermSet = TermSet {
    english: &["asset allocation", "allocation by asset class", "asset classes"],
    german: &["vermögensaufteilung", "vermögensstruktur", "anlageklassen", "asset-allokation"],
};

pub const CURRENCY_ALLOCATION_HEADERS: TermSet = TermSet {
    english: &["currency allocation", "currency breakdown", "currency exposure"],
    german: &["währungsaufteilung", "währungsstruktur", "währungsallokation"],
};

pub const PERFORMANCE_HEADERS: TermSet = TermSet {
    english: &["performance", "returns"],
    german: &["wertentwicklung", "rendite"],
};

pub const SECTION_END_MARKERS: TermSet = TermSet {
    english: &[
        "disclaimer",
        "important information",
        "transactions",
        "holdings",
        "positions",
        "notes",
    ],
    german: &[
        "wichtige hinweise",
        "hinweise",
        "transaktionen",
        "umsätze",
        "positionen",
        "depotbestand",
    ],
};

pub const ASSET_CLASSES: TermSet = TermSet {
    english: &[
        "equities",
        "equity",
        "stocks",
        "bonds",
        "fixed income",
        "cash",
        "money market",
        "real estate",
        "commodities",
        "alternatives",
        "hedge funds",
        "private equity",
        "precious metals",
        "gold",
        "funds",
        "etfs",
    ],
    german: &[
        "aktien",
        "anleihen",
        "renten",
        "liquidität",
        "geldmarkt",
        "immobilien",
        "rohstoffe",
        "alternative anlagen",
        "edelmetalle",
        "fonds",
    ],
};

/// Performance period phrases and the key they normalize to.
pub const PERFORMANCE_PERIODS: &[(&str, &str)] = &[
    ("year to date", "ytd"),
    ("ytd", "ytd"),
    ("seit jahresbeginn", "ytd"),
    ("lfd. jahr", "ytd"),
    ("since inception", "since_inception"),
    ("seit auflage", "since_inception"),
    ("seit beginn", "since_inception"),
    ("1 month", "1m"),
    ("1 monat", "1m"),
    ("3 months", "3m"),
    ("3 monate", "3m"),
    ("6 months", "6m"),
    ("6 monate", "6m"),
    ("12 months", "1y"),
    ("12 monate", "1y"),
    ("1 year", "1y"),
    ("1 jahr", "1y"),
    ("3 years", "3y"),
    ("3 jahre", "3y"),
    ("5 years", "5y"),
    ("5 jahre", "5y"),
    ("10 years", "10y"),
    ("10 jahre", "10y"),
];

// ============================================================================
// Months
// ============================================================================

/// Month names and abbreviations (lowercase) with their month number.
pub const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("januar", 1),
    ("jan", 1),
    ("jänner", 1),
    ("february", 2),
    ("februar", 2),
    ("feb", 2),
    ("march", 3),
    ("märz", 3),
    ("maerz", 3),
    ("mar", 3),
    ("mär", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("mai", 5),
    ("june", 6),
    ("juni", 6),
    ("jun", 6),
    ("july", 7),
    ("juli", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oktober", 10),
    ("oct", 10),
    ("okt", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dezember", 12),
    ("dec", 12),
    ("dez", 12),
];
