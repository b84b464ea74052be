use serde::Serialize;
use serde_json::{json, Value};

use crate::actions::ActionResult;
use crate::cli::OutputFormat;

/// Print an action outcome the way a page shows a toast.
///
/// Failures are returned as errors so the process exits non-zero.
pub fn output_action<T, F>(output_format: OutputFormat, success_message: &str, result: ActionResult<T>, describe: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if let OutputFormat::Json = output_format {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    match result {
        ActionResult::Success(data) => {
            if let OutputFormat::Text = output_format {
                println!("✓ {}", success_message);
                println!("{}", describe(&data));
            }
            Ok(())
        }
        ActionResult::Failure(message) => Err(anyhow::anyhow!(message)),
    }
}

/// Output read results in the appropriate format
pub fn output_data<T, F>(output_format: OutputFormat, data: &T, describe: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "data": data }))?),
        OutputFormat::Text => println!("{}", describe(data)),
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: Value::Array(vec![]) }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}
