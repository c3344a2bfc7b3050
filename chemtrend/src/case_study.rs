//! Named molecule series.

use chemtrend_chem::{similarity_profile, FingerprintSource};
use chemtrend_core::{Annotated, Result, TrendError};
use serde::{Deserialize, Serialize};

/// One drug-discovery series: an ordered SMILES list whose first entry is
/// the reference compound (hit or lead) and whose remaining entries follow
/// the development steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudy {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    smiles: Vec<String>,
}

impl CaseStudy {
    pub fn new<I, S>(name: impl Into<String>, smiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            smiles: smiles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn smiles(&self) -> &[String] {
        &self.smiles
    }

    /// The reference compound, if the series is non-empty.
    pub fn reference(&self) -> Option<&str> {
        self.smiles.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.smiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smiles.is_empty()
    }

    /// Similarity of every step to the reference. Parse failures are
    /// prefixed with the study name.
    pub fn profile<F>(&self, source: &F) -> Result<Vec<f64>>
    where
        F: FingerprintSource + ?Sized,
    {
        similarity_profile(source, &self.smiles).map_err(|e| match e {
            TrendError::Parse(msg) => TrendError::Parse(format!("{}: {msg}", self.name)),
            TrendError::InvalidInput(msg) => {
                TrendError::InvalidInput(format!("{}: {msg}", self.name))
            }
            other => other,
        })
    }
}

impl Annotated for CaseStudy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemtrend_chem::PathSource;

    #[test]
    fn profile_starts_at_one() {
        let study = CaseStudy::new("ethanol", ["CCO", "CCN", "CCCO"]);
        let profile = study.profile(&PathSource::default()).unwrap();
        assert_eq!(profile.len(), 3);
        assert_eq!(profile[0], 1.0);
        assert!(profile[1..].iter().all(|&s| (0.0..1.0).contains(&s)));
    }

    #[test]
    fn errors_name_the_study() {
        let study = CaseStudy::new("broken", ["CCO", "C1CC"]);
        match study.profile(&PathSource::default()).unwrap_err() {
            TrendError::Parse(msg) => {
                assert!(msg.starts_with("broken: "));
                assert!(msg.contains("record 1"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let empty = CaseStudy::new("empty", Vec::<String>::new());
        assert!(matches!(
            empty.profile(&PathSource::default()),
            Err(TrendError::InvalidInput(_))
        ));
    }

    #[test]
    fn annotations() {
        let study = CaseStudy::new("imatinib", ["c1ccncc1"]).with_description("kinase series");
        assert_eq!(study.name(), "imatinib");
        assert_eq!(study.description(), Some("kinase series"));
        assert_eq!(study.reference(), Some("c1ccncc1"));
    }
}
