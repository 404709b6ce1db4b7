use async_trait::async_trait;

use crate::error::Result;
use crate::models::AnalysisResult;

/// The external analysis collaborator: free text in, validated summary,
/// category confidences and risk score out.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult>;
    fn name(&self) -> &str;
}
