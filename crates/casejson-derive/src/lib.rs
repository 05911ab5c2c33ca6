use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{
    Data, DeriveInput, Fields, GenericParam, Ident, LitStr, Type, Variant, parse_macro_input,
    parse_quote,
};

/// Field layout of one enum variant
enum CaseFields {
    Unit,
    Tuple(Vec<Type>),
    Named(Vec<(Ident, Type)>),
}

impl CaseFields {
    fn types(&self) -> Vec<&Type> {
        match self {
            Self::Unit => Vec::new(),
            Self::Tuple(types) => types.iter().collect(),
            Self::Named(fields) => fields.iter().map(|(_, ty)| ty).collect(),
        }
    }
}

struct Case {
    ident: Ident,
    name: String,
    fields: CaseFields,
}

/// Derives `TaggedUnion` for an enum, plus `Serialize` and `Deserialize`
/// impls that go through the union codec.
///
/// Fields of tuple and struct variants are positional on the wire (`Item0`,
/// `Item1`, ...) in declaration order.
///
/// # Attributes
///
/// - `#[tagged_union(rename = "Name")]` on a variant - case name used in the
///   `__Case` discriminator (default: the variant identifier)
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, TaggedUnion)]
/// pub enum CustomerEvent {
///     CustomerRegistered { company_name: String, number: String },
///     CustomerDeleted(String),
/// }
/// ```
#[proc_macro_derive(TaggedUnion, attributes(tagged_union))]
pub fn derive_tagged_union(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "TaggedUnion can only be derived for enums",
        ));
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "TaggedUnion cannot be derived for enums with lifetime parameters",
        ));
    }

    let cases = data
        .variants
        .iter()
        .map(parse_case)
        .collect::<syn::Result<Vec<_>>>()?;

    let krate = quote!(::casejson);
    let ident = &input.ident;
    let union_name = ident.to_string();

    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(param) = param {
            param
                .bounds
                .push(parse_quote!(#krate::__private::serde::Serialize));
            param
                .bounds
                .push(parse_quote!(#krate::__private::serde::de::DeserializeOwned));
            param.bounds.push(parse_quote!('static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut de_generics = generics.clone();
    de_generics.params.insert(0, parse_quote!('de));
    let (de_impl_generics, _, _) = de_generics.split_for_impl();

    let descriptor_cases = cases.iter().map(|case| {
        let name = &case.name;
        let slots = case.fields.types().into_iter().map(|ty| {
            let type_name = type_name(ty);
            quote!(#krate::FieldSlot { type_name: #type_name })
        });
        quote!(#krate::VariantCase { name: #name, fields: &[#(#slots),*] })
    });

    let index_arms = cases.iter().enumerate().map(|(index, case)| {
        let variant = &case.ident;
        match &case.fields {
            CaseFields::Unit => quote!(Self::#variant => #index),
            CaseFields::Tuple(_) => quote!(Self::#variant(..) => #index),
            CaseFields::Named(_) => quote!(Self::#variant { .. } => #index),
        }
    });

    let write_arms = cases.iter().map(|case| {
        let variant = &case.ident;
        match &case.fields {
            CaseFields::Unit => quote!(Self::#variant => {}),
            CaseFields::Tuple(types) => {
                let bindings = positional_bindings(types.len());
                quote! {
                    Self::#variant(#(#bindings),*) => {
                        #(__writer.field(#bindings)?;)*
                    }
                }
            }
            CaseFields::Named(fields) => {
                let names = fields.iter().map(|(name, _)| name);
                let bindings = positional_bindings(fields.len());
                quote! {
                    Self::#variant { #(#names: #bindings),* } => {
                        #(__writer.field(#bindings)?;)*
                    }
                }
            }
        }
    });

    let construct_arms = cases.iter().enumerate().map(|(index, case)| {
        let variant = &case.ident;
        match &case.fields {
            CaseFields::Unit => quote!(#index => Ok(Self::#variant)),
            CaseFields::Tuple(types) => {
                let values = types.iter().map(|_| quote!(__fields.next()?));
                quote!(#index => Ok(Self::#variant(#(#values),*)))
            }
            CaseFields::Named(fields) => {
                let names = fields.iter().map(|(name, _)| name);
                quote!(#index => Ok(Self::#variant { #(#names: __fields.next()?),* }))
            }
        }
    });

    // An enum without variants has no values to take apart.
    let case_index_body = if cases.is_empty() {
        quote!(match *self {})
    } else {
        quote!(match self { #(#index_arms),* })
    };
    let write_fields_body = if cases.is_empty() {
        quote!(match *self {})
    } else {
        quote! {
            match self { #(#write_arms)* }
            Ok(())
        }
    };

    let expanded = quote! {
        impl #impl_generics #krate::TaggedUnion for #ident #ty_generics #where_clause {
            fn descriptor() -> &'static #krate::UnionDescriptor {
                static DESCRIPTOR: #krate::UnionDescriptor = #krate::UnionDescriptor {
                    name: #union_name,
                    cases: &[#(#descriptor_cases),*],
                };
                &DESCRIPTOR
            }

            fn case_index(&self) -> usize {
                #case_index_body
            }

            #[allow(unused_variables)]
            fn write_fields<__W: #krate::FieldWriter>(
                &self,
                __writer: &mut __W,
            ) -> ::core::result::Result<(), __W::Error> {
                #write_fields_body
            }

            #[allow(unused_mut)]
            fn construct(
                __case: usize,
                mut __fields: #krate::Fields,
            ) -> #krate::Result<Self> {
                match __case {
                    #(#construct_arms,)*
                    _ => Err(__fields.unknown_case()),
                }
            }
        }

        impl #impl_generics #krate::__private::serde::Serialize for #ident #ty_generics #where_clause {
            fn serialize<__S>(&self, serializer: __S) -> ::core::result::Result<__S::Ok, __S::Error>
            where
                __S: #krate::__private::serde::Serializer,
            {
                #krate::as_union::serialize(self, serializer)
            }
        }

        impl #de_impl_generics #krate::__private::serde::Deserialize<'de> for #ident #ty_generics #where_clause {
            fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
            where
                __D: #krate::__private::serde::Deserializer<'de>,
            {
                #krate::as_union::deserialize(deserializer)
            }
        }
    };

    Ok(expanded)
}

fn parse_case(variant: &Variant) -> syn::Result<Case> {
    let fields = match &variant.fields {
        Fields::Unit => CaseFields::Unit,
        Fields::Unnamed(fields) => {
            CaseFields::Tuple(fields.unnamed.iter().map(|field| field.ty.clone()).collect())
        }
        Fields::Named(fields) => CaseFields::Named(
            fields
                .named
                .iter()
                .filter_map(|field| field.ident.clone().map(|name| (name, field.ty.clone())))
                .collect(),
        ),
    };

    Ok(Case {
        ident: variant.ident.clone(),
        name: case_name(variant)?,
        fields,
    })
}

/// Pattern bindings for a variant's fields, named so they cannot shadow
/// the generated method parameters.
fn positional_bindings(count: usize) -> Vec<Ident> {
    (0..count).map(|i| format_ident!("__field{}", i)).collect()
}

/// Case name from `#[tagged_union(rename = "...")]`, else the variant identifier.
fn case_name(variant: &Variant) -> syn::Result<String> {
    let mut name = variant.ident.to_string();
    for attr in &variant.attrs {
        if !attr.path().is_ident("tagged_union") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                name = value.value();
                Ok(())
            } else {
                Err(meta.error("unsupported tagged_union attribute, expected `rename`"))
            }
        })?;
    }
    Ok(name)
}

/// Declared type as written, without the token spacing `quote` inserts.
fn type_name(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("")
}
