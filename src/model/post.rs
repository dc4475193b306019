//! Posts published by agents

use crate::cypher::NodeType;
use crate::graph::{FromProperties, MappingResult, PropertyMap, PropertyReader, ToProperties};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post, reply or repost; AT Protocol records carry a record key and CID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// AT Protocol record key (rkey)
    pub record_key: Option<String>,
    /// AT Protocol content identifier
    pub content_id: Option<String>,
    pub like_count: u32,
    pub repost_count: u32,
    pub reply_count: u32,
    pub reply_to_post_id: Option<Uuid>,
    pub repost_of_post_id: Option<Uuid>,
    pub tags: Vec<String>,
}

impl Post {
    pub fn new(author_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            content: content.into(),
            created_at: Utc::now(),
            record_key: None,
            content_id: None,
            like_count: 0,
            repost_count: 0,
            reply_count: 0,
            reply_to_post_id: None,
            repost_of_post_id: None,
            tags: Vec::new(),
        }
    }

    /// Reply to `parent` by the given author
    pub fn reply_to(parent: &Post, author_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            reply_to_post_id: Some(parent.id),
            ..Self::new(author_id, content)
        }
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_post_id.is_some()
    }
}

impl NodeType for Post {
    const TYPE_NAME: &'static str = "Post";
}

impl ToProperties for Post {
    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("Id".into(), self.id.into());
        props.insert("AuthorId".into(), self.author_id.into());
        props.insert("Content".into(), self.content.clone().into());
        props.insert("CreatedAt".into(), self.created_at.into());
        props.insert("RecordKey".into(), self.record_key.clone().into());
        props.insert("ContentId".into(), self.content_id.clone().into());
        props.insert("LikeCount".into(), self.like_count.into());
        props.insert("RepostCount".into(), self.repost_count.into());
        props.insert("ReplyCount".into(), self.reply_count.into());
        props.insert("ReplyToPostId".into(), self.reply_to_post_id.into());
        props.insert("RepostOfPostId".into(), self.repost_of_post_id.into());
        props.insert("Tags".into(), self.tags.clone().into());
        props
    }
}

impl FromProperties for Post {
    fn from_properties(properties: &PropertyMap) -> MappingResult<Self> {
        let reader = PropertyReader::new(properties);
        Ok(Self {
            id: reader.required("Id")?,
            author_id: reader.required("AuthorId")?,
            content: reader.or_default("Content", String::new())?,
            created_at: reader.required("CreatedAt")?,
            record_key: reader.optional("RecordKey")?,
            content_id: reader.optional("ContentId")?,
            like_count: reader.or_default("LikeCount", 0)?,
            repost_count: reader.or_default("RepostCount", 0)?,
            reply_count: reader.or_default("ReplyCount", 0)?,
            reply_to_post_id: reader.optional("ReplyToPostId")?,
            repost_of_post_id: reader.optional("RepostOfPostId")?,
            tags: reader.or_default("Tags", Vec::new())?,
        })
    }
}
