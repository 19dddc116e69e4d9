use {crate::Value, common::pub_fields_struct};

/// Declared column type. This is a convention shared with callers; row
/// values are never checked against it, only presence and nullability are
/// enforced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataType {
    Boolean,
    Int,
    Float,
    String,
}

pub_fields_struct! {
    #[derive(Debug, Clone, PartialEq)]
    struct ColumnDef {
        name: String,
        data_type: DataType,
        is_nullable: bool,
        // Stored for introspection only; never applied to incoming rows.
        default: Option<Value>,
    }
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_nullable,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}
