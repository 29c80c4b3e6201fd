use crate::decode_table::TableMetadata;
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) fn columns_trait(table: &TableMetadata) -> TokenStream {
    let name = &table.item.ident;
    let column_defs = table.persisted().map(|f| {
        let ty = &f.ty;
        let property = f.property();
        let id = f.id;
        if f.embedded {
            quote! {
                result.extend(
                    <#ty as ::quarry::Columns>::column_defs()
                        .into_iter()
                        .map(|v| v.nested_in(#property, #id)),
                );
            }
        } else {
            let column = &f.column;
            quote! {
                result.push(::quarry::ColumnDef {
                    property: ::quarry::PropertyName::from_static(#property),
                    column: #column.to_string(),
                    value: <#ty as ::quarry::AsValue>::as_empty_value(),
                    nullable: <#ty as ::quarry::AsValue>::NULLABLE,
                    id: #id,
                });
            }
        }
    });
    let transient = table
        .fields
        .iter()
        .filter(|f| f.ignore)
        .map(|f| f.property());
    let column_value = table.persisted().map(|f| {
        let ident = &f.ident;
        let property = f.property();
        if f.embedded {
            quote! {
                [#property, rest @ ..] if !rest.is_empty() => {
                    ::quarry::Columns::column_value(&self.#ident, rest)
                }
            }
        } else {
            quote! {
                [#property] => Some(::quarry::AsValue::as_value(
                    ::std::clone::Clone::clone(&self.#ident),
                )),
            }
        }
    });
    let from_row = table.fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        if f.ignore {
            quote!(#ident: ::std::default::Default::default())
        } else if f.embedded {
            quote!(#ident: <#ty as ::quarry::Columns>::from_row(row)?)
        } else {
            let column = &f.column;
            quote! {
                #ident: <#ty as ::quarry::AsValue>::try_from_value(
                    row.get_column(#column).cloned().ok_or_else(|| __make_error__(#column))?,
                )?
            }
        }
    });
    quote! {
        impl ::quarry::Columns for #name {
            fn column_defs() -> ::std::vec::Vec<::quarry::ColumnDef> {
                let mut result = ::std::vec::Vec::new();
                #(#column_defs)*
                result
            }
            fn transient_fields() -> &'static [&'static str] {
                &[#(#transient),*]
            }
            fn column_value(&self, path: &[&str]) -> ::std::option::Option<::quarry::Value> {
                match path {
                    #(#column_value)*
                    _ => None,
                }
            }
            fn from_row(row: &::quarry::RowLabeled) -> ::quarry::Result<Self> {
                let __make_error__ = |name: &str| ::quarry::Error::msg(format!(
                    "Column `{}` does not exist in the row provided",
                    name
                ));
                Ok(Self {
                    #(#from_row,)*
                })
            }
        }
    }
}
