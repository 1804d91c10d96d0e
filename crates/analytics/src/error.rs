use configuration::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The dataset carries no classifiable turnover at all, either because
    /// every record was dropped during normalization or because the grand
    /// total turnover is zero. ABC percentages are undefined in that case.
    #[error("Dataset contains no classifiable turnover; ABC percentages are undefined")]
    EmptyDataset,

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}
