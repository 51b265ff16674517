use core::fmt;

use rill_types::{Ident, Span, Spanned};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisWarning {
    pub span: Span,
    pub warning_content: Warning,
}

impl Spanned for AnalysisWarning {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl AnalysisWarning {
    pub fn to_friendly_warning_string(&self) -> String {
        self.warning_content.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Warning {
    ShadowsOtherSymbol {
        name: Ident,
    },
    NonSnakeCaseVariableName {
        name: Ident,
    },
    NonSnakeCaseFunctionName {
        name: Ident,
    },
    NonClassCaseStructName {
        struct_name: Ident,
    },
    NonClassCaseEnumName {
        enum_name: Ident,
    },
    NonClassCaseTraitName {
        name: Ident,
    },
}

impl fmt::Display for Warning {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use rill_types::style::*;
        use Warning::*;
        match self {
            ShadowsOtherSymbol { name } => write!(
                f,
                "This shadows another symbol with the same name \"{name}\" in an enclosing scope."
            ),
            NonSnakeCaseVariableName { name } => {
                write!(f,
                "Variable \"{}\" is not idiomatic. Variables should have a snake_case name, like \
                 \"{}\".",
                name,
                to_snake_case(name.as_str())
            )
            }
            NonSnakeCaseFunctionName { name } => {
                write!(f,
                "Function name \"{}\" is not idiomatic. Functions should have a snake_case name, like \
                 \"{}\".",
                name,
                to_snake_case(name.as_str())
            )
            }
            NonClassCaseStructName { struct_name } => {
                write!(f,
                "Struct name \"{}\" is not idiomatic. Structs should have a ClassCase name, like \
                 \"{}\".",
                struct_name,
                to_upper_camel_case(struct_name.as_str())
            )
            }
            NonClassCaseEnumName { enum_name } => {
                write!(f,
                "Enum name \"{}\" is not idiomatic. Enums should have a ClassCase name, like \
                 \"{}\".",
                enum_name,
                to_upper_camel_case(enum_name.as_str())
            )
            }
            NonClassCaseTraitName { name } => {
                write!(f,
                "Trait name \"{}\" is not idiomatic. Traits should have a ClassCase name, like \
                 \"{}\".",
                name,
                to_upper_camel_case(name.as_str())
            )
            }
        }
    }
}
