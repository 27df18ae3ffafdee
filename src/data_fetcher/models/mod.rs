pub mod envelope;
pub mod fixtures;
pub mod leagues;
pub mod predictions;

pub use envelope::{ApiEnvelope, Paging};
pub use fixtures::{ApiFixture, Fixture};
pub use leagues::League;
pub use predictions::{
    ApiPrediction, Comparison, Percentages, Prediction, PredictionDetails, SidePair, TeamOutlook,
};
