//! Routing of a `/bfhl` body to exactly one operation.

use serde_json::{json, Map, Value};

use crate::ai::AiDelegate;
use crate::error::BfhlError;
use crate::math;

pub const RECOGNIZED_KEYS: [&str; 5] = ["fibonacci", "prime", "lcm", "hcf", "AI"];

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Fibonacci(u64),
    Prime(Vec<i128>),
    Lcm(Vec<u64>),
    Hcf(Vec<u64>),
    Ai(String),
}

impl Operation {
    /// Picks the single recognized key out of `body` and checks its argument.
    ///
    /// Unrecognized keys are ignored. Zero or several recognized keys fail
    /// with [`BfhlError::BadRequest`] before any argument is looked at.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, BfhlError> {
        let mut matched = body
            .iter()
            .filter(|(key, _)| RECOGNIZED_KEYS.contains(&key.as_str()));

        let (key, value) = match (matched.next(), matched.next()) {
            (Some(only), None) => only,
            _ => {
                return Err(BfhlError::bad_request(format!(
                    "Request must contain exactly one of: {}",
                    RECOGNIZED_KEYS.join(", ")
                )))
            }
        };

        match key.as_str() {
            "fibonacci" => math::fibonacci_count(value).map(Self::Fibonacci),
            "prime" => math::integer_list(value).map(Self::Prime),
            "lcm" => math::positive_list(value).map(Self::Lcm),
            "hcf" => math::positive_list(value).map(Self::Hcf),
            _ => value
                .as_str()
                .map(|q| Self::Ai(q.to_string()))
                .ok_or_else(|| BfhlError::invalid_argument("AI input must be a non-empty string")),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fibonacci(_) => "fibonacci",
            Self::Prime(_) => "prime",
            Self::Lcm(_) => "lcm",
            Self::Hcf(_) => "hcf",
            Self::Ai(_) => "AI",
        }
    }

    /// Runs the operation. Numeric kernels go to the blocking pool so a large
    /// input never holds a runtime worker.
    pub async fn execute(self, ai: &AiDelegate) -> Result<Value, BfhlError> {
        match self {
            Self::Fibonacci(n) => {
                run_blocking(move || {
                    let terms = math::fibonacci(n)?
                        .iter()
                        .map(|t| math::json_number(t).map(Value::Number))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::Array(terms))
                })
                .await
            }
            Self::Prime(values) => {
                run_blocking(move || Ok(json!(math::filter_primes(&values)))).await
            }
            Self::Lcm(values) => run_blocking(move || Ok(json!(math::lcm(&values)?))).await,
            Self::Hcf(values) => run_blocking(move || Ok(json!(math::hcf(&values)?))).await,
            Self::Ai(question) => Ok(json!(ai.answer(&question).await?)),
        }
    }
}

async fn run_blocking<F>(compute: F) -> Result<Value, BfhlError>
where
    F: FnOnce() -> Result<Value, BfhlError> + Send + 'static,
{
    tokio::task::spawn_blocking(compute).await.map_err(|e| {
        tracing::error!(error = %e, "numeric task did not complete");
        BfhlError::invalid_argument("Computation failed")
    })?
}

/// Validates `body`, runs its operation and returns the `data` payload.
pub async fn dispatch(body: &Value, ai: &AiDelegate) -> Result<Value, BfhlError> {
    let body = body
        .as_object()
        .ok_or_else(|| BfhlError::bad_request("Request body must be a JSON object"))?;

    let operation = Operation::from_body(body)?;
    tracing::debug!(operation = operation.name(), "dispatching");

    operation.execute(ai).await
}
