use serde::{Deserialize, Serialize};

use super::{patch_field, Entity, EntityId};

/// A school class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassEntity {
    pub id: Option<EntityId>,
    pub class_id: Option<i32>,
    pub name: Option<String>,
}

impl Entity for ClassEntity {
    const NAME: &'static str = "classEntity";
    const RESOURCE: &'static str = "class-entities";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn merge_patch(&mut self, patch: Self) {
        patch_field(&mut self.class_id, patch.class_id);
        patch_field(&mut self.name, patch.name);
    }
}
