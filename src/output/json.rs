//! JSON figure data writer.
//!
//! Writes FigurePayload structs to JSON files with proper formatting.

use super::schema::FigurePayload;
use super::validate_path;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write figure data to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let payload = FigurePayload::new(Some(pairs), Some(panels));
/// write_payload(&payload, "figures.json")?;
/// ```
pub fn write_payload(
    payload: &FigurePayload,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing figure data to: {}", output_path.display());

    validate_path(output_path)?;
    super::ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, payload).map_err(OutputError::SerializationFailed)?;

    info!(
        "Figure data written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize figure data to a string
pub fn payload_to_string(payload: &FigurePayload) -> Result<String, OutputError> {
    serde_json::to_string_pretty(payload).map_err(OutputError::SerializationFailed)
}

/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read figure data from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_payload(input_path: impl AsRef<Path>) -> Result<FigurePayload, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading figure data from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let payload: FigurePayload =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Figure data loaded: version {}, generated {}",
        payload.version, payload.generated_at
    );

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{MeasuredSeries, PairSummary};
    use crate::chart::build_pair_chart;
    use tempfile::NamedTempFile;

    fn create_test_payload() -> FigurePayload {
        let pairs = build_pair_chart(&[PairSummary {
            label: "python3 → jvm".to_string(),
            general_ns: 120.0,
            dedicated_ns: 40.0,
            dedicated_name: "jpype".to_string(),
            rpc_ns: 900.0,
            measured: MeasuredSeries {
                general: true,
                dedicated: true,
                rpc: true,
            },
        }]);
        FigurePayload::new(Some(pairs), None)
    }

    #[test]
    fn test_write_and_read_payload() {
        let payload = create_test_payload();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_payload(&payload, path).unwrap();
        let loaded = read_payload(path).unwrap();

        assert_eq!(loaded, payload);
        assert!(loaded.complexity.is_none());
    }

    #[test]
    fn test_payload_to_string_omits_missing_figure() {
        let json = payload_to_string(&create_test_payload()).unwrap();

        assert!(json.contains("\"pairs\""));
        assert!(!json.contains("\"complexity\""));
        assert!(json.contains("\"scale\": \"log\""));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/figures.json");

        write_payload(&create_test_payload(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_payload_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_payload(temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(OutputError::WriteFailed(_))));
    }
}
