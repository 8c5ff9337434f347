//! Flattening transformer: one pure function from the upstream's nested
//! character shape to the flat response record.

use crate::error::PortalError;
use crate::models::{FlatCharacter, UpstreamCharacter};

/// Flatten one upstream character into the response shape.
///
/// `origin.name` and `location.name` are guaranteed by the upstream
/// contract; since that contract is not under our control, their absence is
/// validated explicitly and reported as `MalformedUpstream` rather than
/// left to blow up downstream. `type` defaults to the empty string and a
/// missing episode list counts as zero.
pub fn flatten(raw: UpstreamCharacter) -> Result<FlatCharacter, PortalError> {
    let origin = raw.origin.ok_or_else(|| {
        PortalError::MalformedUpstream(format!("character {} is missing origin.name", raw.id))
    })?;
    let location = raw.location.ok_or_else(|| {
        PortalError::MalformedUpstream(format!("character {} is missing location.name", raw.id))
    })?;

    Ok(FlatCharacter {
        id: raw.id,
        name: raw.name,
        status: raw.status,
        species: raw.species,
        kind: raw.kind,
        gender: raw.gender,
        origin: origin.name,
        location: location.name,
        image: raw.image,
        episode_count: raw.episode.len(),
        created: raw.created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NamedRef;

    fn rick() -> UpstreamCharacter {
        UpstreamCharacter {
            id: 1,
            name: "Rick Sanchez".to_string(),
            status: "Alive".to_string(),
            species: "Human".to_string(),
            kind: String::new(),
            gender: "Male".to_string(),
            origin: Some(NamedRef {
                name: "Earth (C-137)".to_string(),
            }),
            location: Some(NamedRef {
                name: "Citadel of Ricks".to_string(),
            }),
            image: "https://rickandmortyapi.com/api/character/avatar/1.jpeg".to_string(),
            episode: (1..=51)
                .map(|n| format!("https://rickandmortyapi.com/api/episode/{}", n))
                .collect(),
            created: "2017-11-04T18:48:46.250Z".to_string(),
        }
    }

    #[test]
    fn flattens_nested_fields_to_scalars() {
        let flat = flatten(rick()).unwrap();
        assert_eq!(flat.id, 1);
        assert_eq!(flat.origin, "Earth (C-137)");
        assert_eq!(flat.location, "Citadel of Ricks");
        assert_eq!(flat.episode_count, 51);
        assert_eq!(flat.created, "2017-11-04T18:48:46.250Z");
    }

    #[test]
    fn is_deterministic() {
        let a = flatten(rick()).unwrap();
        let b = flatten(rick()).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn empty_episode_list_counts_zero() {
        let mut raw = rick();
        raw.episode = Vec::new();
        let flat = flatten(raw).unwrap();
        assert_eq!(flat.episode_count, 0);
    }

    #[test]
    fn missing_episode_field_deserializes_to_zero_count() {
        // The `episode` field is absent entirely, not just empty.
        let raw: UpstreamCharacter = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Abradolf Lincler",
            "status": "unknown",
            "species": "Human",
            "gender": "Male",
            "origin": { "name": "Earth (Replacement Dimension)" },
            "location": { "name": "Testicle Monster Dimension" },
            "image": "https://rickandmortyapi.com/api/character/avatar/7.jpeg",
            "created": "2017-11-04T19:59:20.523Z"
        }))
        .unwrap();
        let flat = flatten(raw).unwrap();
        assert_eq!(flat.episode_count, 0);
        assert_eq!(flat.kind, "");
    }

    #[test]
    fn missing_origin_is_malformed() {
        let mut raw = rick();
        raw.origin = None;
        match flatten(raw) {
            Err(PortalError::MalformedUpstream(msg)) => {
                assert!(msg.contains("origin"), "message should name the field: {}", msg)
            }
            other => panic!("Expected MalformedUpstream, got {:?}", other),
        }
    }

    #[test]
    fn missing_location_is_malformed() {
        let mut raw = rick();
        raw.location = None;
        assert!(matches!(
            flatten(raw),
            Err(PortalError::MalformedUpstream(_))
        ));
    }

    #[test]
    fn episode_count_tracks_list_length() {
        for k in [0usize, 1, 3, 51] {
            let mut raw = rick();
            raw.episode = (0..k).map(|n| format!("ep/{}", n)).collect();
            assert_eq!(flatten(raw).unwrap().episode_count, k);
        }
    }
}
