use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::model::{Calculator, Category};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog definition: {0}")]
    Parse(#[from] json5::Error),
    #[error("catalog entry has an empty id: {0}")]
    EmptyId(String),
    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),
    #[error("duplicate calculator id: {0}")]
    DuplicateCalculator(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDefinition {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    color_token: String,
    #[serde(default)]
    icon_ref: String,
    #[serde(default)]
    calculators: Vec<CalculatorDefinition>,
}

#[derive(Debug, Deserialize)]
struct CalculatorDefinition {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDefinition {
    categories: Vec<CategoryDefinition>,
}

/// Static registry of categories, each owning its calculators in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::new();
        let mut calculator_ids = HashSet::new();

        for category in &categories {
            if category.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(category.title.clone()));
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
            for calculator in category.calculators() {
                if calculator.id.trim().is_empty() {
                    return Err(CatalogError::EmptyId(calculator.title.clone()));
                }
                if !calculator_ids.insert(calculator.id.as_str()) {
                    return Err(CatalogError::DuplicateCalculator(calculator.id.clone()));
                }
            }
        }

        Ok(Self { categories })
    }

    pub fn from_json5(source: &str) -> Result<Self, CatalogError> {
        let definition: CatalogDefinition = json5::from_str(source)?;
        let categories = definition
            .categories
            .into_iter()
            .map(|category| {
                let calculators = category
                    .calculators
                    .into_iter()
                    .map(|calc| {
                        Calculator::from_owned(calc.id, calc.title, calc.description, calc.keywords)
                    })
                    .collect();
                Category::new(
                    &category.id,
                    &category.title,
                    &category.description,
                    &category.color_token,
                    &category.icon_ref,
                    calculators,
                )
            })
            .collect();

        Self::new(categories)
    }

    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json5(&raw)
    }

    pub fn list_categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn list_all_calculators(&self) -> Vec<&Calculator> {
        self.categories
            .iter()
            .flat_map(|category| category.calculators().iter())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.calculators().len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Calculator> {
        self.categories
            .iter()
            .flat_map(|category| category.calculators().iter())
            .find(|calculator| calculator.id == id)
    }

    /// Resolves ids in the given order. Ids missing from the catalog are
    /// skipped; persisted state may outlive the calculators it names.
    pub fn resolve_ids<'a, I>(&self, ids: I) -> Vec<&Calculator>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter()
            .filter_map(|id| {
                let found = self.find(id);
                if found.is_none() {
                    tracing::debug!(calculator_id = id, "skipping stale calculator id");
                }
                found
            })
            .collect()
    }

    pub fn builtin() -> Self {
        Self {
            categories: builtin_categories(),
        }
    }
}

fn builtin_categories() -> Vec<Category> {
    vec![
        Category::new(
            "finance",
            "Finance",
            "Money, loans, and business math",
            "emerald",
            "icon-coins",
            vec![
                Calculator::new(
                    "break-even",
                    "Break-Even Point",
                    "Units you must sell to cover fixed and variable costs",
                    &["profitability", "fixed costs", "margin", "business"],
                ),
                Calculator::new(
                    "compound-interest",
                    "Compound Interest",
                    "Growth of savings with periodic compounding",
                    &["savings", "investment", "apr", "apy"],
                ),
                Calculator::new(
                    "loan-payment",
                    "Loan Payment",
                    "Monthly payment for an amortized loan",
                    &["mortgage", "amortization", "installment", "emi"],
                ),
                Calculator::new(
                    "roi",
                    "Return on Investment",
                    "Gain relative to the amount invested",
                    &["roi", "profit", "yield"],
                ),
                Calculator::new(
                    "sales-tax",
                    "Sales Tax",
                    "Price before and after sales tax or VAT",
                    &["vat", "gst", "tax"],
                ),
            ],
        ),
        Category::new(
            "math",
            "Math",
            "Arithmetic helpers and number formatting",
            "indigo",
            "icon-sigma",
            vec![
                Calculator::new(
                    "percentage",
                    "Percentage",
                    "Percent of a value, percent change, and ratios",
                    &["percent", "ratio", "increase", "decrease"],
                ),
                Calculator::new(
                    "rounding",
                    "Rounding",
                    "Round numbers to decimal places or significant figures",
                    &["sig fig", "significant figures", "precision"],
                ),
                Calculator::new(
                    "fraction",
                    "Fraction Simplifier",
                    "Reduce fractions and convert to decimals",
                    &["gcd", "numerator", "denominator"],
                ),
                Calculator::new(
                    "decimal-shift",
                    "Decimal Point Shifter",
                    "Move the decimal point by powers of ten",
                    &["scientific notation", "exponent"],
                ),
                Calculator::new(
                    "average",
                    "Average",
                    "Mean, median, and mode of a list of numbers",
                    &["mean", "median", "mode", "statistics"],
                ),
            ],
        ),
        Category::new(
            "health",
            "Health",
            "Body metrics and fitness estimates",
            "rose",
            "icon-heart",
            vec![
                Calculator::new(
                    "bmi",
                    "BMI",
                    "Body mass index from height and weight",
                    &["body mass index", "weight"],
                ),
                Calculator::new(
                    "bmr",
                    "Basal Metabolic Rate",
                    "Daily calories burned at rest",
                    &["calories", "metabolism", "tdee"],
                ),
                Calculator::new(
                    "water-intake",
                    "Water Intake",
                    "Recommended daily water consumption",
                    &["hydration", "drink"],
                ),
            ],
        ),
        Category::new(
            "everyday",
            "Everyday",
            "Quick answers for daily life",
            "amber",
            "icon-sun",
            vec![
                Calculator::new(
                    "tip",
                    "Tip Calculator",
                    "Tip amount and split bill per person",
                    &["gratuity", "split bill", "restaurant"],
                ),
                Calculator::new(
                    "date-diff",
                    "Date Difference",
                    "Days, weeks, and months between two dates",
                    &["days between", "duration", "calendar"],
                ),
                Calculator::new(
                    "age",
                    "Age Calculator",
                    "Exact age in years, months, and days",
                    &["birthday", "born"],
                ),
                Calculator::new(
                    "fuel-cost",
                    "Fuel Cost",
                    "Trip fuel cost from distance and consumption",
                    &["gas", "petrol", "mileage", "mpg"],
                ),
            ],
        ),
        Category::new(
            "science",
            "Science",
            "Unit conversion and physics basics",
            "cyan",
            "icon-atom",
            vec![
                Calculator::new(
                    "unit-convert",
                    "Unit Converter",
                    "Length, mass, volume, and temperature conversions",
                    &["metric", "imperial", "celsius", "fahrenheit"],
                ),
                Calculator::new(
                    "speed",
                    "Speed, Distance, Time",
                    "Solve for speed, distance, or travel time",
                    &["velocity", "pace"],
                ),
                Calculator::new(
                    "ohms-law",
                    "Ohm's Law",
                    "Voltage, current, and resistance",
                    &["voltage", "current", "resistance", "electricity"],
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn builtin_catalog_passes_validation() {
        let builtin = Catalog::builtin();
        let revalidated = Catalog::new(builtin.list_categories().to_vec()).unwrap();
        assert_eq!(revalidated.len(), builtin.len());
    }

    #[test]
    fn calculators_carry_owning_category() {
        let catalog = Catalog::builtin();
        let rounding = catalog.find("rounding").unwrap();
        assert_eq!(rounding.category_id, "math");
        assert_eq!(rounding.category_title, "Math");
    }
}
