//! Request shape checks owned by the transport layer.
//!
//! The store accepts any identifiers; these rules keep nonsense out before
//! it gets there.

use explore_types::api::PutDecisionRequest;

use crate::error::ApiError;

pub fn decision(req: &PutDecisionRequest) -> Result<(), ApiError> {
    if req.actor_id == req.recipient_id {
        return Err(ApiError::InvalidArgument(
            "you can't like yourself".into(),
        ));
    }
    if !is_numeric(&req.actor_id) {
        return Err(ApiError::InvalidArgument("actor id must be a number".into()));
    }
    recipient(&req.recipient_id)
}

pub fn recipient(recipient_id: &str) -> Result<(), ApiError> {
    if !is_numeric(recipient_id) {
        return Err(ApiError::InvalidArgument(
            "recipient id must be a number".into(),
        ));
    }
    Ok(())
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn req(actor: &str, recipient: &str) -> PutDecisionRequest {
        PutDecisionRequest {
            actor_id: actor.into(),
            recipient_id: recipient.into(),
            liked: true,
        }
    }

    #[test]
    fn accepts_distinct_numeric_ids() {
        assert!(decision(&req("12", "345")).is_ok());
    }

    #[rstest]
    #[case::self_like("7", "7", "you can't like yourself")]
    #[case::empty_actor("", "7", "actor id must be a number")]
    #[case::alpha_actor("abc", "7", "actor id must be a number")]
    #[case::signed_actor("-3", "7", "actor id must be a number")]
    #[case::empty_recipient("7", "", "recipient id must be a number")]
    #[case::spaced_recipient("7", " 8", "recipient id must be a number")]
    #[case::unicode_digits("7", "٣", "recipient id must be a number")]
    fn rejects_bad_pairs(#[case] actor: &str, #[case] recipient: &str, #[case] message: &str) {
        let err = decision(&req(actor, recipient)).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}
