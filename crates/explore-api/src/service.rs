//! Match service: the business rules layered over the decision store.

use explore_db::{Context, Cursor, DecisionRow, DecisionStore, Page, StoreError};
use explore_types::api::{
    CountLikedYouResponse, Liker, ListLikedYouResponse, PutDecisionResponse,
};

#[derive(Clone)]
pub struct MatchService {
    store: DecisionStore,
}

impl MatchService {
    pub fn new(store: DecisionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DecisionStore {
        &self.store
    }

    /// Record the decision, then report whether it completed a mutual like.
    ///
    /// A pass never reports a match. A like reports one only if the reverse
    /// decision is a like once this write is durable.
    pub async fn put_decision(
        &self,
        ctx: &Context,
        actor_id: &str,
        recipient_id: &str,
        liked: bool,
    ) -> Result<PutDecisionResponse, StoreError> {
        self.store
            .put_decision(ctx, actor_id, recipient_id, liked)
            .await?;

        let mutual_likes = liked && self.store.is_mutual(ctx, actor_id, recipient_id).await?;
        Ok(PutDecisionResponse { mutual_likes })
    }

    pub async fn count_liked_you(
        &self,
        ctx: &Context,
        recipient_id: &str,
    ) -> Result<CountLikedYouResponse, StoreError> {
        let count = self.store.count_liked_you(ctx, recipient_id).await?;
        Ok(CountLikedYouResponse { count })
    }

    pub async fn list_liked_you(
        &self,
        ctx: &Context,
        recipient_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<ListLikedYouResponse, StoreError> {
        let cursor = parse_token(pagination_token)?;
        let page = self.store.list_liked_you(ctx, recipient_id, cursor).await?;
        Ok(into_response(page))
    }

    pub async fn list_new_liked_you(
        &self,
        ctx: &Context,
        recipient_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<ListLikedYouResponse, StoreError> {
        let cursor = parse_token(pagination_token)?;
        let page = self.store.list_new_liked_you(ctx, recipient_id, cursor).await?;
        Ok(into_response(page))
    }
}

/// An empty token means "from the top", same as no token.
fn parse_token(token: Option<&str>) -> Result<Option<Cursor>, StoreError> {
    token
        .filter(|t| !t.is_empty())
        .map(Cursor::decode)
        .transpose()
}

fn into_response(page: Page<DecisionRow>) -> ListLikedYouResponse {
    let likers = page
        .items
        .into_iter()
        .map(|d| Liker {
            unix_timestamp: u64::try_from(d.created_at.timestamp()).unwrap_or_default(),
            actor_id: d.actor_id,
        })
        .collect();

    ListLikedYouResponse {
        likers,
        next_pagination_token: page.next.as_ref().map(Cursor::encode),
    }
}
