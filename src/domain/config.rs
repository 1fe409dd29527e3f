use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::ObjectId;

/// Field-name and collection-name contracts for one deployment.
///
/// The engine never hard-codes document layout. Every collection and field it
/// reads is named here, with defaults matching the stock schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Built-in object types.
    pub objects: Objects,

    /// Collections the loaders and repair lookups read from.
    pub collections: Collections,

    /// Field names within instance documents.
    pub fields: Fields,
}

/// The three built-in mainline object types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objects {
    /// The business object type. Always the first element of the spine.
    pub business: ObjectId,
    /// The set object type.
    pub set: ObjectId,
    /// The module object type. Always the last element of the spine.
    pub module: ObjectId,
}

/// Collection names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collections {
    /// Business records.
    pub business: String,
    /// Set records.
    pub set: String,
    /// Module records.
    pub module: String,
    /// Generic instances, including custom mainline levels.
    pub instance: String,
    /// Model descriptions, one per object type.
    pub model: String,
    /// Model associations, including the mainline chain.
    pub association: String,
}

/// Field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fields {
    /// Business id on business, set and module records.
    pub business_id: String,
    /// Dotted path of the business label on generic instances.
    ///
    /// The label stores the business id as a string.
    pub business_label: String,
    /// Set id on set records.
    pub set_id: String,
    /// Module id on module records.
    pub module_id: String,
    /// Instance id on generic instance records.
    pub instance_id: String,
    /// Parent instance id, shared by every instance type.
    pub parent_id: String,
    /// Integer "default" flag on set and module records.
    pub default_flag: String,
    /// Object type discriminator on generic instances and model records.
    pub object_id: String,
    /// Association kind on association records.
    pub association_kind: String,
    /// The association kind value that marks a mainline link.
    pub mainline_association: String,
    /// The parent object type on association records.
    pub association_parent: String,
    /// Display name on business records.
    pub business_name: String,
    /// Display name on set records.
    pub set_name: String,
    /// Display name on module records.
    pub module_name: String,
    /// Display name on generic instance records.
    pub instance_name: String,
    /// Display name on model description records.
    pub model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Versions::V1 {
            objects: None,
            collections: None,
            fields: None,
        }
        .into()
    }
}

impl Default for Objects {
    fn default() -> Self {
        Self {
            business: builtin("biz"),
            set: builtin("set"),
            module: builtin("module"),
        }
    }
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            business: "cc_ApplicationBase".to_string(),
            set: "cc_SetBase".to_string(),
            module: "cc_ModuleBase".to_string(),
            instance: "cc_ObjectBase".to_string(),
            model: "cc_ObjDes".to_string(),
            association: "cc_ObjAsst".to_string(),
        }
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            business_id: "bk_biz_id".to_string(),
            business_label: "metadata.label.bk_biz_id".to_string(),
            set_id: "bk_set_id".to_string(),
            module_id: "bk_module_id".to_string(),
            instance_id: "bk_inst_id".to_string(),
            parent_id: "bk_parent_id".to_string(),
            default_flag: "default".to_string(),
            object_id: "bk_obj_id".to_string(),
            association_kind: "bk_asst_id".to_string(),
            mainline_association: "bk_mainline".to_string(),
            association_parent: "bk_asst_obj_id".to_string(),
            business_name: "bk_biz_name".to_string(),
            set_name: "bk_set_name".to_string(),
            module_name: "bk_module_name".to_string(),
            instance_name: "bk_inst_name".to_string(),
            model_name: "bk_obj_name".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns `true` for the business, set and module object types.
    #[must_use]
    pub fn is_builtin(&self, object: &ObjectId) -> bool {
        *object == self.objects.business
            || *object == self.objects.set
            || *object == self.objects.module
    }

    /// The display-name field for instances of the given object type.
    #[must_use]
    pub fn name_field(&self, object: &ObjectId) -> &str {
        if *object == self.objects.business {
            &self.fields.business_name
        } else if *object == self.objects.set {
            &self.fields.set_name
        } else if *object == self.objects.module {
            &self.fields.module_name
        } else {
            &self.fields.instance_name
        }
    }
}

fn builtin(s: &str) -> ObjectId {
    ObjectId::try_from(s).unwrap_or_else(|_| unreachable!("built-in object type {s:?} is empty"))
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        objects: Option<Objects>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        collections: Option<Collections>,

        /// Partial tables are not supported; a `[fields]` table must name
        /// every field.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fields: Option<Fields>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                objects,
                collections,
                fields,
            } => Self {
                objects: objects.unwrap_or_default(),
                collections: collections.unwrap_or_default(),
                fields: fields.unwrap_or_default(),
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            objects: Some(config.objects),
            collections: Some(config.collections),
            fields: Some(config.fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\n\n[objects]\nbusiness = \"app\"\nset = \"cluster\"\nmodule = \"service\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.objects.business, "app");
        assert_eq!(config.objects.set, "cluster");
        assert_eq!(config.objects.module, "service");
        assert_eq!(config.collections, Collections::default());
        assert_eq!(config.fields, Fields::default());
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\n\n[objects]\nbusiness = \"\"\nset = \"set\"\nmodule = \"module\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_custom_collections() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("topo.toml");

        let mut config = Config::default();
        config.collections.instance = "cc_ObjectBase_0_pub".to_string();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn name_field_falls_back_to_instance_name() {
        let config = Config::default();
        let rack = ObjectId::try_from("rack").unwrap();

        assert_eq!(config.name_field(&config.objects.set), "bk_set_name");
        assert_eq!(config.name_field(&rack), "bk_inst_name");
        assert!(config.is_builtin(&config.objects.module));
        assert!(!config.is_builtin(&rack));
    }
}
