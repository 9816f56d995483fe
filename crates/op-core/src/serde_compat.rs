//! JSON wire format for derived types.
//!
//! Fields are camelCase and every value uses its canonical label. Only the
//! seed fields are required on import; the type is always re-derived from
//! them, and any derived field present in the document must agree with the
//! re-derived value.

use serde::{Deserialize, Serialize};

use crate::animal::{Animal, AnimalStack};
use crate::error::{OpError, Result};
use crate::function::CognitiveFunction;
use crate::modality::Modality;
use crate::optype::{OpType, OpTypeSeed};
use crate::quadra::Quadra;
use crate::social::SocialType;

pub const CURRENT_VERSION: &str = "1.0";

#[derive(Serialize, Deserialize, Debug)]
pub struct WireExport {
    pub version: String,
    #[serde(rename = "opType")]
    pub op_type: WireOpType,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireOpType {
    pub observer: CognitiveFunction,
    pub decider: CognitiveFunction,
    #[serde(default)]
    pub is_single_observer: bool,
    pub modality: Modality,
    pub animal_stack: AnimalStack,
    pub social_type: SocialType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadra: Option<Quadra>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_stack: Option<[CognitiveFunction; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savior_functions: Option<[CognitiveFunction; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_activated_animal: Option<Animal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masculine_functions: Option<[CognitiveFunction; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_stack: Option<[Animal; 4]>,
}

impl WireOpType {
    pub fn from_op_type(op_type: &OpType) -> Self {
        let seed = op_type.seed();
        WireOpType {
            observer: seed.observer,
            decider: seed.decider,
            is_single_observer: seed.is_single_observer,
            modality: seed.modality,
            animal_stack: seed.animal_stack,
            social_type: seed.social_type,
            quadra: Some(op_type.quadra()),
            grant_stack: Some(*op_type.grant_stack()),
            savior_functions: Some(*op_type.savior_functions()),
            double_activated_animal: Some(op_type.double_activated_animal()),
            masculine_functions: Some(*op_type.masculine_functions()),
            social_stack: Some(*op_type.social_stack()),
        }
    }

    pub fn seed(&self) -> OpTypeSeed {
        OpTypeSeed {
            observer: self.observer,
            decider: self.decider,
            is_single_observer: self.is_single_observer,
            modality: self.modality,
            animal_stack: self.animal_stack,
            social_type: self.social_type,
        }
    }

    /// Re-derive from the seed fields and check every stored derived field.
    pub fn into_op_type(self) -> Result<OpType> {
        let op_type = self.seed().derive()?;
        check("quadra", self.quadra, op_type.quadra(), |q| q.to_string())?;
        check("grant stack", self.grant_stack, *op_type.grant_stack(), |s| {
            join(s.iter().map(|f| f.label()))
        })?;
        check(
            "savior functions",
            self.savior_functions,
            *op_type.savior_functions(),
            |s| join(s.iter().map(|f| f.label())),
        )?;
        check(
            "double activated animal",
            self.double_activated_animal,
            op_type.double_activated_animal(),
            |a| a.to_string(),
        )?;
        check(
            "masculine functions",
            self.masculine_functions,
            *op_type.masculine_functions(),
            |s| join(s.iter().map(|f| f.label())),
        )?;
        check("social stack", self.social_stack, *op_type.social_stack(), |s| {
            join(s.iter().map(|a| a.to_string()))
        })?;
        Ok(op_type)
    }
}

fn check<T: PartialEq>(
    kind: &'static str,
    stored: Option<T>,
    derived: T,
    render: impl Fn(&T) -> String,
) -> Result<()> {
    match stored {
        Some(stored) if stored != derived => Err(OpError::validation(
            kind,
            format!("{} (derives to {})", render(&stored), render(&derived)),
        )),
        _ => Ok(()),
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join("/")
}

/// Whether a file written at `version` can be read: the major versions match.
pub fn is_compatible_version(version: &str) -> bool {
    let major = |v: &str| v.split('.').next().map(str::trim).map(str::to_owned);
    major(version) == major(CURRENT_VERSION)
}

/// Deserialize a JSON export and re-derive the type it describes.
pub fn import_json(json: &str) -> Result<OpType> {
    let wire: WireExport =
        serde_json::from_str(json).map_err(|e| OpError::validation("json", e.to_string()))?;
    if !is_compatible_version(&wire.version) {
        return Err(OpError::validation("wire format version", wire.version));
    }
    wire.op_type.into_op_type()
}

/// Serialize a type to the JSON wire format.
pub fn export_json(op_type: &OpType) -> std::result::Result<String, serde_json::Error> {
    let wire = WireExport {
        version: CURRENT_VERSION.to_string(),
        op_type: WireOpType::from_op_type(op_type),
    };
    serde_json::to_string_pretty(&wire)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gamma() -> OpType {
        OpTypeSeed::from_labels("Se", "Fi", false, "FM", "CS/B(P)", "#1")
            .unwrap()
            .derive()
            .unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let t = gamma();
        let json = export_json(&t).unwrap();
        assert_eq!(import_json(&json).unwrap(), t);
    }

    #[test]
    fn test_export_uses_labels() {
        let json = export_json(&gamma()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], CURRENT_VERSION);
        let t = &value["opType"];
        assert_eq!(t["observer"], "Se");
        assert_eq!(t["decider"], "Fi");
        assert_eq!(t["isSingleObserver"], false);
        assert_eq!(t["animalStack"], "CS/B(P)");
        assert_eq!(t["socialType"], "#1");
        assert_eq!(t["quadra"], "gamma");
        assert_eq!(t["grantStack"][2], "Ni");
        assert_eq!(t["doubleActivatedAnimal"], "S");
    }

    #[test]
    fn test_import_seed_only() {
        let json = r##"{
            "version": "1.0",
            "opType": {
                "observer": "Se",
                "decider": "Fi",
                "modality": "FM",
                "animalStack": "CSBP",
                "socialType": "#1"
            }
        }"##;
        let t = import_json(json).unwrap();
        assert_eq!(t, gamma());
    }

    #[test]
    fn test_compatible_versions() {
        assert!(is_compatible_version(CURRENT_VERSION));
        assert!(is_compatible_version("1.7"));
        assert!(!is_compatible_version("2.0"));
        assert!(!is_compatible_version(""));
    }

    #[test]
    fn test_import_rejects_tampered_derived_field() {
        let json = export_json(&gamma()).unwrap().replace("\"gamma\"", "\"alpha\"");
        let err = import_json(&json).unwrap_err();
        assert!(matches!(err, OpError::Validation { kind: "quadra", .. }));
    }

    #[test]
    fn test_import_rejects_bad_labels_and_versions() {
        let bad_label = export_json(&gamma()).unwrap().replace("\"FM\"", "\"XY\"");
        assert!(import_json(&bad_label).is_err());

        let future = export_json(&gamma())
            .unwrap()
            .replace(CURRENT_VERSION, "2.0");
        assert!(matches!(
            import_json(&future),
            Err(OpError::Validation {
                kind: "wire format version",
                ..
            })
        ));

        assert!(import_json("not json").is_err());
    }
}
