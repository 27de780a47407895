use serde::{Deserialize, Serialize};

// -- Decisions --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PutDecisionRequest {
    pub actor_id: String,
    pub recipient_id: String,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutDecisionResponse {
    pub mutual_likes: bool,
}

// -- Likes --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountLikedYouRequest {
    pub recipient_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountLikedYouResponse {
    pub count: u64,
}

/// Shared by `ListLikedYou` and `ListNewLikedYou`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListLikedYouRequest {
    pub recipient_id: String,
    #[serde(default)]
    pub pagination_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liker {
    pub actor_id: String,
    /// Seconds since the epoch at which the like was first recorded.
    pub unix_timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLikedYouResponse {
    pub likers: Vec<Liker>,
    /// Absent once the last page has been delivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_pagination_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_request_token_is_optional() {
        let req: ListLikedYouRequest =
            serde_json::from_str(r#"{"recipient_id":"7"}"#).unwrap();
        assert_eq!(req.recipient_id, "7");
        assert!(req.pagination_token.is_none());
    }

    #[test]
    fn put_request_rejects_unknown_fields() {
        let res = serde_json::from_str::<PutDecisionRequest>(
            r#"{"actor_id":"1","recipient_id":"2","liked":true,"weight":3}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn final_page_omits_next_token() {
        let resp = ListLikedYouResponse {
            likers: vec![Liker { actor_id: "4".into(), unix_timestamp: 1_700_000_000 }],
            next_pagination_token: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("next_pagination_token").is_none());
        assert_eq!(json["likers"][0]["actor_id"], "4");
    }
}
