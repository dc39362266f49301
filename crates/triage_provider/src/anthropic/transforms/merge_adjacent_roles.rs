use crate::Transformer;
use crate::anthropic::{Message, Request};

/// Folds consecutive messages with the same role into a single message, as
/// the Messages API expects user and assistant turns to alternate.
pub struct MergeAdjacentRoles;

impl Transformer for MergeAdjacentRoles {
    type Value = Request;

    fn transform(&mut self, mut request: Self::Value) -> Self::Value {
        let messages = std::mem::take(request.get_messages_mut());
        let mut merged: Vec<Message> = Vec::with_capacity(messages.len());

        for message in messages {
            match merged.last_mut() {
                Some(last) if last.role == message.role => last.content.extend(message.content),
                _ => merged.push(message),
            }
        }

        *request.get_messages_mut() = merged;
        request
    }
}
