use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;

use crate::db::{Message, Participant};

use super::{Store, StoreError, StoreResult};

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    participants: RwLock<HashMap<String, Participant>>,
    messages: RwLock<Vec<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_participant(&self, participant: &Participant) -> StoreResult<()> {
        let mut participants = self.participants.write().map_err(|_| StoreError::Poisoned)?;
        if participants.contains_key(&participant.name) {
            return Err(StoreError::DuplicateName(participant.name.clone()));
        }
        participants.insert(participant.name.clone(), participant.clone());
        Ok(())
    }

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
        let participants = self.participants.read().map_err(|_| StoreError::Poisoned)?;
        Ok(participants.get(name).cloned())
    }

    async fn list_participants(&self) -> StoreResult<Vec<Participant>> {
        let participants = self.participants.read().map_err(|_| StoreError::Poisoned)?;
        Ok(participants.values().cloned().collect())
    }

    async fn touch_participant(&self, name: &str, last_status: i64) -> StoreResult<bool> {
        let mut participants = self.participants.write().map_err(|_| StoreError::Poisoned)?;
        let Some(participant) = participants.get_mut(name) else {
            return Ok(false);
        };
        participant.last_status = last_status;
        Ok(true)
    }

    async fn delete_participant_if_idle(&self, name: &str, cutoff: i64) -> StoreResult<bool> {
        let mut participants = self.participants.write().map_err(|_| StoreError::Poisoned)?;
        match participants.get(name) {
            Some(p) if p.last_status < cutoff => {
                participants.remove(name);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_message(&self, message: &Message) -> StoreResult<()> {
        self.messages
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(message.clone());
        Ok(())
    }

    async fn list_messages(&self) -> StoreResult<Vec<Message>> {
        Ok(self.messages.read().map_err(|_| StoreError::Poisoned)?.clone())
    }
}
