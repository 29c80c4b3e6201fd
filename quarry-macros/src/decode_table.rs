use crate::decode_field::{FieldMetadata, decode_field};
use quote::ToTokens;
use syn::{Fields, ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) item: ItemStruct,
    pub(crate) table: String,
    pub(crate) fields: Vec<FieldMetadata>,
}

impl TableMetadata {
    pub(crate) fn persisted(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.fields.iter().filter(|v| !v.ignore)
    }
}

pub(crate) fn decode_table(item: ItemStruct) -> TableMetadata {
    if !item.generics.params.is_empty() {
        panic!("`{}` cannot be mapped: generic structs are not supported", item.ident);
    }
    let Fields::Named(..) = &item.fields else {
        panic!("`{}` cannot be mapped: only structs with named fields are supported", item.ident);
    };
    let fields = item.fields.iter().map(decode_field).collect();
    let mut table = item.ident.to_string();
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("quarry") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `quarry`, use it like: `#[quarry(attribute = value, ..)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("table") {
                let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `table`, use it like: `#[quarry(table = \"my_table\")]`");
                };
                table = value.value();
            } else {
                panic!(
                    "Unknown attribute `{}` inside quarry macro",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
    }
    TableMetadata {
        item,
        table,
        fields,
    }
}
