//! Simulated social-network agents

use crate::cypher::NodeType;
use crate::graph::{
    FromProperties, FromPropertyValue, MappingError, MappingResult, PropertyMap, PropertyReader,
    PropertyValue, ToProperties,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Network an agent participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtocolType {
    /// Standard social network
    #[default]
    Traditional,
    /// AT Protocol (Bluesky)
    ATProtocol,
    /// Both
    Hybrid,
}

impl ProtocolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolType::Traditional => "Traditional",
            ProtocolType::ATProtocol => "ATProtocol",
            ProtocolType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProtocolType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traditional" => Ok(ProtocolType::Traditional),
            "atprotocol" => Ok(ProtocolType::ATProtocol),
            "hybrid" => Ok(ProtocolType::Hybrid),
            _ => Err(format!("unknown protocol type '{}'", s)),
        }
    }
}

impl FromPropertyValue for ProtocolType {
    const EXPECTED: &'static str = "String";

    fn from_property_value(property: &str, value: &PropertyValue) -> MappingResult<Self> {
        let raw = String::from_property_value(property, value)?;
        raw.parse().map_err(|message| MappingError::InvalidValue {
            property: property.to_string(),
            message,
        })
    }
}

/// Behavioural traits that drive simulation decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBehavior {
    /// How often the agent posts (0.0 to 1.0)
    pub posting_frequency: f64,
    /// How likely the agent engages with content (0.0 to 1.0)
    pub engagement_rate: f64,
    /// How influential the agent is (0.0 to 1.0)
    pub influence_score: f64,
    /// Topics of interest
    pub interests: Vec<String>,
}

impl Default for AgentBehavior {
    fn default() -> Self {
        Self {
            posting_frequency: 0.5,
            engagement_rate: 0.5,
            influence_score: 0.5,
            interests: Vec::new(),
        }
    }
}

/// A user of the simulated network, stored under the `Agent` label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAgent {
    pub id: Uuid,
    pub username: String,
    /// AT Protocol DID, e.g. `did:plc:z72i7hdynmk6r22z27h6tvur`
    pub decentralized_id: Option<String>,
    /// AT Protocol handle, e.g. `user.bsky.social`
    pub handle: Option<String>,
    pub display_name: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub behavior: AgentBehavior,
    pub follower_count: u32,
    pub following_count: u32,
    pub post_count: u32,
    pub protocol_type: ProtocolType,
}

impl SocialAgent {
    /// New agent with a fresh id, created now, default behaviour
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id: Uuid::new_v4(),
            display_name: username.clone(),
            username,
            decentralized_id: None,
            handle: None,
            bio: String::new(),
            created_at: Utc::now(),
            behavior: AgentBehavior::default(),
            follower_count: 0,
            following_count: 0,
            post_count: 0,
            protocol_type: ProtocolType::Traditional,
        }
    }
}

impl NodeType for SocialAgent {
    const TYPE_NAME: &'static str = "SocialAgent";
    const LABEL: Option<&'static str> = Some("Agent");
}

// Behaviour is flattened; graph properties cannot hold maps.
impl ToProperties for SocialAgent {
    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("Id".into(), self.id.into());
        props.insert("Username".into(), self.username.clone().into());
        props.insert("DecentralizedId".into(), self.decentralized_id.clone().into());
        props.insert("Handle".into(), self.handle.clone().into());
        props.insert("DisplayName".into(), self.display_name.clone().into());
        props.insert("Bio".into(), self.bio.clone().into());
        props.insert("CreatedAt".into(), self.created_at.into());
        props.insert("PostingFrequency".into(), self.behavior.posting_frequency.into());
        props.insert("EngagementRate".into(), self.behavior.engagement_rate.into());
        props.insert("InfluenceScore".into(), self.behavior.influence_score.into());
        props.insert("Interests".into(), self.behavior.interests.clone().into());
        props.insert("FollowerCount".into(), self.follower_count.into());
        props.insert("FollowingCount".into(), self.following_count.into());
        props.insert("PostCount".into(), self.post_count.into());
        props.insert("ProtocolType".into(), self.protocol_type.as_str().into());
        props
    }
}

impl FromProperties for SocialAgent {
    fn from_properties(properties: &PropertyMap) -> MappingResult<Self> {
        let reader = PropertyReader::new(properties);
        let defaults = AgentBehavior::default();

        Ok(Self {
            id: reader.required("Id")?,
            username: reader.or_default("Username", String::new())?,
            decentralized_id: reader.optional("DecentralizedId")?,
            handle: reader.optional("Handle")?,
            display_name: reader.or_default("DisplayName", String::new())?,
            bio: reader.or_default("Bio", String::new())?,
            created_at: reader.required("CreatedAt")?,
            behavior: AgentBehavior {
                posting_frequency: reader
                    .or_default("PostingFrequency", defaults.posting_frequency)?,
                engagement_rate: reader.or_default("EngagementRate", defaults.engagement_rate)?,
                influence_score: reader.or_default("InfluenceScore", defaults.influence_score)?,
                interests: reader.or_default("Interests", defaults.interests)?,
            },
            follower_count: reader.or_default("FollowerCount", 0)?,
            following_count: reader.or_default("FollowingCount", 0)?,
            post_count: reader.or_default("PostCount", 0)?,
            protocol_type: reader.or_default("ProtocolType", ProtocolType::default())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher::label_of;

    fn sample() -> SocialAgent {
        let mut agent = SocialAgent::new("alice");
        agent.handle = Some("alice.bsky.social".to_string());
        agent.protocol_type = ProtocolType::Hybrid;
        agent.follower_count = 12;
        agent.behavior.interests = vec!["rust".to_string(), "graphs".to_string()];
        agent.behavior.influence_score = 0.9;
        agent
    }

    #[test]
    fn test_agent_label_override() {
        assert_eq!(label_of::<SocialAgent>().as_str(), "Agent");
    }

    #[test]
    fn test_agent_round_trip() {
        let agent = sample();
        let decoded = SocialAgent::from_properties(&agent.to_properties()).unwrap();
        assert_eq!(decoded, agent);
    }

    #[test]
    fn test_behavior_is_flattened() {
        let props = sample().to_properties();
        assert_eq!(props.get("InfluenceScore"), Some(&PropertyValue::Float(0.9)));
        assert!(props.values().all(|v| v.as_map().is_none()));
    }

    #[test]
    fn test_decode_is_case_insensitive_with_defaults() {
        let agent = sample();
        let mut props = PropertyMap::new();
        props.insert("id".into(), agent.id.into());
        props.insert("createdat".into(), agent.created_at.into());
        props.insert("USERNAME".into(), "bob".into());

        let decoded = SocialAgent::from_properties(&props).unwrap();
        assert_eq!(decoded.id, agent.id);
        assert_eq!(decoded.username, "bob");
        assert_eq!(decoded.behavior, AgentBehavior::default());
        assert_eq!(decoded.protocol_type, ProtocolType::Traditional);
    }

    #[test]
    fn test_unknown_protocol_type() {
        let mut props = sample().to_properties();
        props.insert("ProtocolType".into(), "Carrier Pigeon".into());

        let err = SocialAgent::from_properties(&props).unwrap_err();
        assert!(matches!(err, MappingError::InvalidValue { .. }));
    }

    #[test]
    fn test_protocol_type_parse() {
        assert_eq!("atprotocol".parse::<ProtocolType>(), Ok(ProtocolType::ATProtocol));
        assert_eq!(ProtocolType::Hybrid.to_string(), "Hybrid");
    }
}
