//! In-memory implementations of the core ports for service tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chat_core::{
    participant_pair, Conversation, ConversationRepository, DomainError, GroupMembership,
    GroupSummary, LikedRepository, Message, MessageColor, MessageRepository, NewMessage,
    RepoResult, RowId, ThreadKind, TimelineEntry, User, UserRepository,
};
use chrono::{DateTime, Utc};
use validator::Validate;

use super::context::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct State {
    users: HashMap<RowId, User>,
    conversations: Vec<Conversation>,
    /// Kept in insertion order, not sorted
    messages: Vec<Message>,
    liked: HashSet<(RowId, RowId)>,
    groups: HashMap<RowId, Vec<GroupSummary>>,
    groups_down: bool,
    store_down: bool,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> RowId {
        self.next_id += 1;
        RowId::new(self.next_id)
    }

    fn check_up(&self) -> RepoResult<()> {
        if self.store_down {
            Err(DomainError::ConnectionUnavailable("store down".to_string()))
        } else {
            Ok(())
        }
    }
}

/// One store backing every port
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn context(self: &Arc<Self>) -> ServiceContext {
        ServiceContextBuilder::new()
            .user_repo(self.clone())
            .conversation_repo(self.clone())
            .message_repo(self.clone())
            .liked_repo(self.clone())
            .group_membership(self.clone())
            .build()
            .unwrap()
    }

    pub fn add_user(&self, name: &str) -> RowId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let mut user = User::new(id, name.to_lowercase());
        user.display_name = Some(name.to_string());
        state.users.insert(id, user);
        id
    }

    pub fn set_color(&self, user_id: RowId, hex: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.get_mut(&user_id) {
            user.message_color = Some(MessageColor::parse(hex).unwrap());
        }
    }

    pub fn remove_user(&self, user_id: RowId) {
        self.state.lock().unwrap().users.remove(&user_id);
    }

    /// Conversation with an explicit id, for ordering tests
    pub fn add_conversation(&self, id: i64, a: RowId, b: RowId) -> RowId {
        let mut state = self.state.lock().unwrap();
        let id = RowId::new(id);
        state.conversations.push(Conversation::new(id, a, b).unwrap());
        id
    }

    /// Message with an explicit id and timestamp, appended unsorted
    pub fn add_message(
        &self,
        id: i64,
        conversation_id: RowId,
        sender_id: RowId,
        content: &str,
        timestamp: Option<DateTime<Utc>>,
    ) {
        self.state.lock().unwrap().messages.push(Message {
            id: RowId::new(id),
            conversation_id,
            sender_id,
            content: content.to_string(),
            timestamp,
            color: MessageColor::default(),
            kind: chat_core::MessageKind::Text,
            audio: None,
            sender_avatar: None,
        });
    }

    pub fn add_group(&self, user_id: RowId, group: GroupSummary) {
        let mut state = self.state.lock().unwrap();
        state.groups.entry(user_id).or_default().push(group);
    }

    pub fn set_groups_down(&self, down: bool) {
        self.state.lock().unwrap().groups_down = down;
    }

    pub fn set_store_down(&self, down: bool) {
        self.state.lock().unwrap().store_down = down;
    }

    pub fn liked_count(&self) -> usize {
        self.state.lock().unwrap().liked.len()
    }
}

fn last_message<'a>(messages: &'a [Message], conversation_id: RowId) -> Option<&'a Message> {
    messages
        .iter()
        .filter(|m| m.conversation_id == conversation_id)
        .max_by_key(|m| m.ordering_key())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: RowId) -> RepoResult<Option<User>> {
        let state = self.state.lock().unwrap();
        state.check_up()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn exists(&self, id: RowId) -> RepoResult<bool> {
        let state = self.state.lock().unwrap();
        state.check_up()?;
        Ok(state.users.contains_key(&id))
    }
}

#[async_trait]
impl ConversationRepository for MemoryStore {
    async fn find_by_id(&self, id: RowId) -> RepoResult<Option<Conversation>> {
        let state = self.state.lock().unwrap();
        state.check_up()?;
        Ok(state.conversations.iter().find(|c| c.id == id).copied())
    }

    async fn is_participant(&self, conversation_id: RowId, user_id: RowId) -> RepoResult<bool> {
        let state = self.state.lock().unwrap();
        state.check_up()?;
        Ok(state
            .conversations
            .iter()
            .any(|c| c.id == conversation_id && c.involves(user_id)))
    }

    async fn find_or_create(&self, user_a: RowId, user_b: RowId) -> RepoResult<Conversation> {
        let (low, high) = participant_pair(user_a, user_b)?;
        let mut state = self.state.lock().unwrap();
        state.check_up()?;
        if let Some(existing) = state
            .conversations
            .iter()
            .find(|c| c.involves(low) && c.involves(high))
        {
            return Ok(*existing);
        }
        let id = state.next_id();
        let conversation = Conversation::new(id, low, high)?;
        state.conversations.push(conversation);
        Ok(conversation)
    }

    async fn direct_timeline(&self, user_id: RowId) -> RepoResult<Option<Vec<TimelineEntry>>> {
        let state = self.state.lock().unwrap();
        state.check_up()?;
        if !state.users.contains_key(&user_id) {
            return Ok(None);
        }

        let entries = state
            .conversations
            .iter()
            .filter_map(|c| {
                let other = state.users.get(&c.counterpart(user_id)?)?;
                let last = last_message(&state.messages, c.id);
                Some(TimelineEntry {
                    kind: ThreadKind::Direct,
                    id: c.id,
                    display_name: other.visible_name().to_string(),
                    other_user_id: Some(other.id),
                    other_username: Some(other.username.clone()),
                    avatar_key: other.avatar_key.clone(),
                    last_activity: last.and_then(|m| m.timestamp),
                    last_preview: last.map(|m| m.content.clone()),
                    liked: state.liked.contains(&(user_id, c.id)),
                })
            })
            .collect();
        Ok(Some(entries))
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn list_by_conversation(&self, conversation_id: RowId) -> RepoResult<Vec<Message>> {
        let state = self.state.lock().unwrap();
        state.check_up()?;
        Ok(state
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn append(&self, message: &NewMessage) -> RepoResult<Message> {
        message.validate()?;
        let mut state = self.state.lock().unwrap();
        state.check_up()?;
        if !state.conversations.iter().any(|c| c.id == message.conversation_id) {
            return Err(DomainError::ConversationNotFound(message.conversation_id));
        }
        let color = match &message.color {
            Some(color) => color.clone(),
            None => state
                .users
                .get(&message.sender_id)
                .map(User::preferred_color)
                .unwrap_or_default(),
        };
        let id = state.next_id();
        let stored = Message {
            id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            timestamp: Some(Utc::now()),
            color,
            kind: message.effective_kind(),
            audio: message.audio.clone(),
            sender_avatar: None,
        };
        state.messages.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl LikedRepository for MemoryStore {
    async fn set_liked(&self, user_id: RowId, conversation_id: RowId, liked: bool) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        state.check_up()?;
        if liked {
            state.liked.insert((user_id, conversation_id));
        } else {
            state.liked.remove(&(user_id, conversation_id));
        }
        Ok(())
    }

    async fn is_liked(&self, user_id: RowId, conversation_id: RowId) -> RepoResult<bool> {
        let state = self.state.lock().unwrap();
        state.check_up()?;
        Ok(state.liked.contains(&(user_id, conversation_id)))
    }
}

#[async_trait]
impl GroupMembership for MemoryStore {
    async fn joined_groups(&self, user_id: RowId) -> RepoResult<Vec<GroupSummary>> {
        let state = self.state.lock().unwrap();
        if state.groups_down {
            return Err(DomainError::GroupServiceError("group service down".to_string()));
        }
        Ok(state.groups.get(&user_id).cloned().unwrap_or_default())
    }
}
