//! Parameter types shared by the list and by-id handlers.

use pagination::PageRequest;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, ObjectId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::validation::{Check, Rule, check, first_violation, path_input, validate};

/// Normalised `page`/`perPage` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageParams {
    pub(crate) page: u64,
    pub(crate) per_page: u64,
}

impl PageParams {
    pub(crate) fn to_request(self) -> ApiResult<PageRequest> {
        PageRequest::new(self.page, self.per_page).map_err(|err| {
            Error::invalid_request("perPage must be an integer > 0.")
                .with_details(json!({ "field": "perPage", "reason": err.to_string() }))
        })
    }
}

/// Validate an object identifier taken from the request path.
pub(crate) fn parse_object_id(raw: String, message: &'static str) -> ApiResult<ObjectId> {
    let rules: [Check; 1] = [check("id", Rule::ObjectId, message)];
    let normalised = validate(&rules, &path_input("id", raw)).map_err(first_violation)?;
    normalised
        .get("id")
        .and_then(serde_json::Value::as_str)
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| Error::invalid_request(message).with_details(json!({ "field": "id" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn page_params_compute_skip() {
        let request = PageParams {
            page: 3,
            per_page: 25,
        }
        .to_request()
        .expect("valid page");
        assert_eq!(request.skip(), 75);
        assert_eq!(request.limit(), 25);
    }

    #[rstest]
    fn zero_page_size_is_rejected() {
        let error = PageParams {
            page: 0,
            per_page: 0,
        }
        .to_request()
        .expect_err("zero page size");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("65a1f0c2e4b0a1b2c3d4e5f6", true)]
    #[case("65A1F0C2E4B0A1B2C3D4E5F6", true)]
    #[case("65a1f0c2e4b0a1b2c3d4e5f", false)]
    #[case("zza1f0c2e4b0a1b2c3d4e5f6", false)]
    fn object_id_path_segments(#[case] raw: &str, #[case] valid: bool) {
        let result = parse_object_id(raw.to_owned(), "Invalid id.");
        assert_eq!(result.is_ok(), valid);
        if let Err(error) = result {
            assert_eq!(error.message(), "Invalid id.");
        }
    }
}
