use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::chat::ChatTurn;

/// Ordered, append-only chat history for one visitor session.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<ChatTurn>,
}

impl ConversationLog {
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

/// In-memory session logs keyed by session id. Lost on restart.
#[derive(Clone, Default)]
pub struct ChatSessions {
    inner: Arc<RwLock<HashMap<Uuid, ConversationLog>>>,
}

impl ChatSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends turns to a session, creating it on first use.
    pub async fn append(&self, session_id: Uuid, turns: impl IntoIterator<Item = ChatTurn>) {
        let mut sessions = self.inner.write().await;
        let log = sessions.entry(session_id).or_default();
        for turn in turns {
            log.append(turn);
        }
    }

    pub async fn history(&self, session_id: Uuid) -> Option<Vec<ChatTurn>> {
        self.inner
            .read()
            .await
            .get(&session_id)
            .map(|log| log.turns().to_vec())
    }
}
