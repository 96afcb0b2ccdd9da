//! Category catalog: category -> dataset display name -> query token + schema location.
//!
//! JSON shape (declaration order is kept and drives option order):
//! {
//!   "Drug": {
//!     "Adverse Effects": {
//!       "query_token": "event",                      // sent to the API
//!       "schema_location": "fieldData/drugEvent.yaml" // resolved by a Fetcher
//!     }
//!   }
//! }
//!
//! `value` / `url` are accepted as aliases for the two dataset keys.

use crate::Result;

use anyhow::{Context, bail};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Query tokens and category names end up as URL path segments.
const PATH_SEGMENT_RE: &str = r"^[a-z0-9][a-z0-9_-]*$";

/// Raw dataset shape as it appears in catalog JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDataset {
    #[serde(alias = "value")]
    pub query_token: String,

    #[serde(alias = "url")]
    pub schema_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub query_token: String,
    pub schema_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub datasets: Vec<(String, DatasetEntry)>,
}

/// Validated, immutable catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Parse and validate catalog JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: Map<String, Value> =
            serde_json::from_str(text).context("catalog must be a JSON object")?;

        let mut categories = Vec::with_capacity(raw.len());
        for (name, datasets) in raw {
            let datasets: Map<String, Value> = serde_json::from_value(datasets)
                .with_context(|| format!("category '{}' must map dataset names to entries", name))?;

            let mut entries = Vec::with_capacity(datasets.len());
            for (display, entry) in datasets {
                let RawDataset {
                    query_token,
                    schema_location,
                } = serde_json::from_value(entry)
                    .with_context(|| format!("bad dataset entry '{}' in category '{}'", display, name))?;
                entries.push((
                    display,
                    DatasetEntry {
                        query_token,
                        schema_location,
                    },
                ));
            }
            categories.push(Category {
                name,
                datasets: entries,
            });
        }

        Self::validate_and_build(categories)
    }

    /// Read catalog JSON from disk.
    pub fn from_file(path: &str) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("read catalog file {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("invalid catalog {}", path))
    }

    /// Check names, tokens and locations; refuse empty categories.
    pub fn validate_and_build(categories: Vec<Category>) -> Result<Self> {
        let re = Regex::new(PATH_SEGMENT_RE)?;

        if categories.is_empty() {
            bail!("catalog contained no categories");
        }

        for (i, category) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.name == category.name) {
                bail!("duplicate category '{}'", category.name);
            }
            if !re.is_match(&category.name.to_lowercase()) {
                bail!(
                    "category name '{}' cannot be used as a URL path segment",
                    category.name
                );
            }
            if category.datasets.is_empty() {
                bail!("category '{}' has no datasets", category.name);
            }

            for (j, (display, entry)) in category.datasets.iter().enumerate() {
                if display.trim().is_empty() {
                    bail!("category '{}' has a dataset with an empty name", category.name);
                }
                if category.datasets[..j].iter().any(|(d, _)| d == display) {
                    bail!(
                        "duplicate dataset '{}' in category '{}'",
                        display,
                        category.name
                    );
                }
                if !re.is_match(&entry.query_token) {
                    bail!(
                        "dataset '{}' in category '{}' has invalid query token '{}'",
                        display,
                        category.name,
                        entry.query_token
                    );
                }
                if entry.schema_location.trim().is_empty() {
                    bail!(
                        "dataset '{}' in category '{}' has no schema location",
                        display,
                        category.name
                    );
                }
            }
        }

        Ok(Self { categories })
    }

    /// The openFDA endpoints, with schemas under `fieldData/`.
    pub fn openfda() -> Self {
        let categories = OPENFDA
            .iter()
            .map(|(name, datasets)| Category {
                name: name.to_string(),
                datasets: datasets
                    .iter()
                    .map(|(display, token, file)| {
                        (
                            display.to_string(),
                            DatasetEntry {
                                query_token: token.to_string(),
                                schema_location: format!("fieldData/{}", file),
                            },
                        )
                    })
                    .collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    /// Dataset display names of a category, in declaration order.
    pub fn dataset_names(&self, category: &str) -> Option<Vec<String>> {
        self.category(category)
            .map(|c| c.datasets.iter().map(|(d, _)| d.clone()).collect())
    }

    pub fn dataset(&self, category: &str, display_name: &str) -> Option<&DatasetEntry> {
        self.category(category)?
            .datasets
            .iter()
            .find(|(d, _)| d == display_name)
            .map(|(_, entry)| entry)
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::openfda()
    }
}

type DatasetRow = (&'static str, &'static str, &'static str);

const OPENFDA: &[(&str, &[DatasetRow])] = &[
    (
        "Drug",
        &[
            ("Adverse Effects", "event", "drugEvent.yaml"),
            ("Product Labeling", "label", "drugLabel.yaml"),
            ("NDC Directory", "ndc", "drugNDC.yaml"),
            ("Recall Reports", "enforcement", "drugEnforcement.yaml"),
            ("FDA Drugs", "drugsfda", "drugFDA.yaml"),
        ],
    ),
    (
        "Device",
        &[
            ("510k", "510k", "device510k.yaml"),
            ("Classification", "classification", "deviceClassification.yaml"),
            ("Recall Reports", "enforcement", "deviceReport.yaml"),
            ("Adverse Effects", "event", "deviceEffects.yaml"),
            ("Pre-market", "pma", "devicePremarket.yaml"),
            ("Recalls", "recall", "deviceRecalls.yaml"),
            ("Registrations/Listings", "registrationlisting", "deviceRegistration.yaml"),
            ("COVID-19 Testing", "covid19serology", "deviceCovid.yaml"),
            ("Unique Device ID", "udi", "deviceID.yaml"),
        ],
    ),
    (
        "Food",
        &[
            ("Recall Reports", "enforcement", "foodReport.yaml"),
            ("Adverse Effects", "event", "foodEffects.yaml"),
        ],
    ),
];
