mod position;

/// Derive macro generating an implementation of the trait `Position`.
///
/// The struct must have a field named `position` whose type implements `Position`.
#[proc_macro_derive(Position)]
pub fn position_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    position::impl_position(syn::parse(input))
        .unwrap_or_else(|e| syn::Error::to_compile_error(&e))
        .into()
}

fn get_field<'a>(name: &str, data: &'a syn::DataStruct) -> Option<&'a syn::Field> {
    data.fields
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == name))
}
