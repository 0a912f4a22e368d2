//! Procedural macros used in the definition and implementation of getters and setters for CertificationPathSettings

use quote::quote;
use syn::parse::ParseStream;
use syn::parse::{Parse, Result};
use syn::{Expr, Ident, Token};

type ValueName = Ident;
type ValueType = Ident;
type DefaultValue = Expr;

/// is_string_numeric is used to determine if a string value contains only numeric characters.
/// It is used to process a slice that omits the first character, i.e., in order to identify
/// types like u8, u32, etc.
fn is_string_numeric(str: &str) -> bool {
    !str.is_empty() && str.chars().all(|c| c.is_numeric())
}

/// Maps a Rust type name to the name of the CertificationPathProcessingTypes variant that carries it,
/// i.e., u8 to U8 and bool to Bool. Other type names are used as is.
fn variant_name(type_name: &str) -> String {
    if type_name == "bool" {
        "Bool".to_string()
    } else if is_string_numeric(&type_name[1..]) {
        type_name.to_uppercase()
    } else {
        type_name.to_string()
    }
}

/// Strips the PS_ prefix from a setting name and lowercases the remainder for use in accessor names.
fn accessor_stem(flag: &Ident) -> String {
    let s = flag.to_string();
    match s.strip_prefix("PS_") {
        Some(stem) => stem.to_lowercase(),
        None => s.to_lowercase(),
    }
}

/// SignatureWithDefault contains the results of parsing a cps_gets_and_sets_with_default definition, i.e., the
/// name of a value stored in a CertificationPathSettings map, the corresponding type and the default value.
struct SignatureWithDefault {
    value_name: ValueName,
    value_type: ValueType,
    default_value: DefaultValue,
}

/// SyntaxWithDefault contains the components of a cps_gets_and_sets_with_default, i.e., a value name, a comma,
/// a value type, a comma and a default value expression. For example:
///
/// ```text
/// cps_gets_and_sets_with_default!(PS_ENFORCE_TRUST_ANCHOR_VALIDITY, bool, true);
/// ```
struct SyntaxWithDefault {
    value_name: ValueName,
    _comma_token: Token!(,),
    value_type: ValueType,
    _comma_token2: Token!(,),
    default_value: DefaultValue,
}

impl Parse for SignatureWithDefault {
    fn parse(stream: ParseStream) -> Result<Self> {
        let syntax = SyntaxWithDefault {
            value_name: stream.parse()?,
            _comma_token: stream.parse()?,
            value_type: stream.parse()?,
            _comma_token2: stream.parse()?,
            default_value: stream.parse()?,
        };

        Ok(SignatureWithDefault {
            value_name: syntax.value_name,
            value_type: syntax.value_type,
            default_value: syntax.default_value,
        })
    }
}

/// Generates `get_x` and `set_x` methods for a setting with a default value. The getter returns
/// the default when the setting is absent or holds a value of the wrong type. Invoke within an
/// `impl CertificationPathSettings` block.
#[proc_macro]
pub fn cps_gets_and_sets_with_default(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let signature = syn::parse_macro_input!(input as SignatureWithDefault);
    let flag = signature.value_name;
    let return_t = signature.value_type;
    let default_value = signature.default_value;

    let flag_str = accessor_stem(&flag);
    let getter_str = format!("get_{}", flag_str);
    let setter_str = format!("set_{}", flag_str);
    let getter = syn::Ident::new(&getter_str, flag.span());
    let setter = syn::Ident::new(&setter_str, flag.span());
    let cps_type = syn::Ident::new(&variant_name(&return_t.to_string()), return_t.span());

    let getter_comment = format!(
        "`{}` is used to retrieve `{}` items from a [`CertificationPathSettings`] instance",
        getter_str, flag
    );
    let setter_comment = format!(
        "`{}` is used to set `{}` items in a [`CertificationPathSettings`] instance",
        setter_str, flag
    );

    let tokens = quote! {
            #[doc = #getter_comment]
            pub fn #getter(&self) -> #return_t {
                match self.0.get(#flag) {
                    Some(CertificationPathProcessingTypes::#cps_type(v)) => v.clone(),
                    _ => #default_value,
                }
            }
            #[doc = #setter_comment]
            pub fn #setter(&mut self, v: #return_t) {
                self.0.insert(
                    #flag.to_string(),
                    CertificationPathProcessingTypes::#cps_type(v),
                );
            }
    };
    tokens.into()
}
