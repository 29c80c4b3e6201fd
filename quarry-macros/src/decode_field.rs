use quote::ToTokens;
use syn::{Field, Ident, LitStr, Type, parse::ParseBuffer};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Column name, meaningless for embedded and ignored fields.
    pub(crate) column: String,
    pub(crate) id: bool,
    pub(crate) embedded: bool,
    pub(crate) ignore: bool,
}

impl FieldMetadata {
    pub(crate) fn property(&self) -> String {
        self.ident.to_string()
    }
}

pub(crate) fn decode_field(field: &Field) -> FieldMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut column = ident.to_string();
    if column.starts_with('_') {
        column.remove(0);
    }
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        column,
        id: false,
        embedded: false,
        ignore: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("quarry") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `quarry`, use it like: `#[quarry(attribute = value, ...)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("column") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `column`, use it like: `#[quarry(column = \"my_column\")]`");
                };
                metadata.column = v.value();
            } else if arg.path.is_ident("id") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `id`, use it like: `#[quarry(id)]`");
                };
                metadata.id = true;
            } else if arg.path.is_ident("embedded") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `embedded`, use it like: `#[quarry(embedded)]`");
                };
                metadata.embedded = true;
            } else if arg.path.is_ident("ignore") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `ignore`, use it like: `#[quarry(ignore)]`");
                };
                metadata.ignore = true;
            } else {
                panic!(
                    "Unknown attribute `{}` inside quarry macro",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
    }
    if metadata.ignore && (metadata.id || metadata.embedded) {
        panic!(
            "Field `{}` is ignored, it cannot also be `id` or `embedded`",
            metadata.ident
        );
    }
    metadata
}
