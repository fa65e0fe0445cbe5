use serde::{Deserialize, Serialize};

use super::{patch_field, Entity, EntityId};

/// A student enrolled in a class.
///
/// `class_nam` is the backend's column name and is kept as-is on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    pub id: Option<EntityId>,
    pub student_id: Option<i32>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub class_nam: Option<String>,
    pub address: Option<String>,
}

impl Entity for Student {
    const NAME: &'static str = "student";
    const RESOURCE: &'static str = "students";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn merge_patch(&mut self, patch: Self) {
        patch_field(&mut self.student_id, patch.student_id);
        patch_field(&mut self.name, patch.name);
        patch_field(&mut self.age, patch.age);
        patch_field(&mut self.class_nam, patch.class_nam);
        patch_field(&mut self.address, patch.address);
    }
}
