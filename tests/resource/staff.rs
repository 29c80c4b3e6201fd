use quarry::{Embeddable, Entity};

#[derive(Entity, Debug, Clone, PartialEq)]
#[quarry(table = "employees")]
pub struct Employee {
    #[quarry(id)]
    pub id: i64,
    #[quarry(column = "given_name")]
    pub first_name: String,
    pub age: Option<i32>,
    pub salary: f64,
    pub retired: bool,
    #[quarry(ignore)]
    pub notes: Vec<String>,
}

impl Employee {
    pub fn new(id: i64, first_name: &str, age: Option<i32>, salary: f64, retired: bool) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            age,
            salary,
            retired,
            notes: Vec::new(),
        }
    }
}

#[derive(Embeddable, Debug, Clone, PartialEq)]
pub struct ShiftKey {
    pub employee_id: i64,
    pub day: i32,
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[quarry(table = "shifts")]
pub struct Shift {
    #[quarry(id, embedded)]
    pub key: ShiftKey,
    pub hours: f32,
    pub _remark: Option<String>,
}
