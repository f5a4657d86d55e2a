//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::parser::LoadInfo;
use crate::report::Summary;
use crate::table::Table;
use crate::transform::{OneHotEncoding, PipelineOutput};

/// Outcome of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Every section of the summary is available
    Ready,
    /// Processed, but the summary carries a warning
    Warning,
    Error,
}

/// Response sent after an upload is processed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    pub status: JobStatus,

    pub load_info: LoadInfo,

    pub summary: Summary,

    /// Full cleaned table
    pub cleaned: Table,

    /// Full one-hot block
    pub encoded: OneHotEncoding,
}

impl UploadResponse {
    pub fn new(output: PipelineOutput, summary: Summary) -> Self {
        let status = if summary.price_by_class.is_warning() {
            JobStatus::Warning
        } else {
            JobStatus::Ready
        };

        Self {
            job_id: Uuid::new_v4().to_string(),
            status,
            load_info: output.load_info,
            summary,
            cleaned: output.cleaned,
            encoded: output.encoded,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": JobStatus::Error,
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_summary;
    use crate::transform::{process_bytes, PipelineOptions};

    const CSV: &str = "Airline,Date_of_Journey,Source,Destination,Route,Dep_Time,Arrival_Time,Duration,Total_Stops,Class,Price\n\
        IndiGo,24/03/2019,Banglore,New Delhi,BLR-DEL,22:20,01:10 22 Mar,2h 50m,non-stop,Economy,3897\n\
        Vistara,1/05/2019,Kolkata,Banglore,CCU-BLR,05:50,13:15,7h 25m,1 stop,Business,21000\n";

    #[test]
    fn test_upload_response_shape() {
        let output = process_bytes(CSV.as_bytes(), &PipelineOptions::default()).unwrap();
        let summary = build_summary(&output, 5).unwrap();
        let response = UploadResponse::new(output, summary);

        assert_eq!(response.status, JobStatus::Ready);
        assert!(Uuid::parse_str(&response.job_id).is_ok());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["summary"]["priceByClass"]["status"], "ready");
        assert_eq!(json["cleaned"]["records"][1]["Total_Stops"], 1);
        assert_eq!(json["encoded"]["features"][0]["source"], "Airline");
        assert_eq!(json["loadInfo"]["format"], "csv");
    }

    #[test]
    fn test_error_response() {
        let body = error_response("No file provided");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "No file provided");
        assert!(body["jobId"].is_string());
    }
}
