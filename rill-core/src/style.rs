//! Naming-convention lints, run as an ordinary analyzer pass.

use crate::error::{ok, AnalysisResult};
use crate::language::{NodeKind, Traversal, Tree};
use crate::pass::{Pass, PassKind, PassName};

use rill_error::warning::Warning;
use rill_types::{Ident, Spanned};

pub const STYLE_CHECKING_PASS: PassName = "style_checking";

/// Detect whether an identifier is written in snake_case.
fn is_snake_case(ident: &Ident) -> bool {
    let trimmed = ident.as_str().trim_start_matches('_');
    !trimmed.contains("__") && !trimmed.contains(char::is_uppercase)
}

/// Detect whether an identifier is written in ClassCase.
fn is_class_case(ident: &Ident) -> bool {
    let name = ident.as_str();
    name.chars().next().map(char::is_uppercase).unwrap_or(false) && !name.contains('_')
}

pub struct StyleChecker;

impl Pass for StyleChecker {
    fn name(&self) -> PassName {
        STYLE_CHECKING_PASS
    }

    fn kind(&self) -> PassKind {
        PassKind::Analyzer
    }

    fn run(&self, tree: &mut Tree) -> AnalysisResult<()> {
        let mut reports = vec![];
        for id in tree.flatten(Traversal::PreOrder) {
            match tree.kind(id) {
                NodeKind::FunctionDeclaration(decl) => {
                    assert_or_warn!(
                        is_snake_case(&decl.name),
                        reports,
                        decl.name.span(),
                        Warning::NonSnakeCaseFunctionName {
                            name: decl.name.clone()
                        }
                    );
                }
                NodeKind::VariableDeclaration(decl) => {
                    assert_or_warn!(
                        is_snake_case(&decl.name),
                        reports,
                        decl.name.span(),
                        Warning::NonSnakeCaseVariableName {
                            name: decl.name.clone()
                        }
                    );
                }
                NodeKind::Parameter(param) => {
                    assert_or_warn!(
                        is_snake_case(&param.name),
                        reports,
                        param.name.span(),
                        Warning::NonSnakeCaseVariableName {
                            name: param.name.clone()
                        }
                    );
                }
                NodeKind::StructDeclaration(decl) => {
                    assert_or_warn!(
                        is_class_case(&decl.name),
                        reports,
                        decl.name.span(),
                        Warning::NonClassCaseStructName {
                            struct_name: decl.name.clone()
                        }
                    );
                }
                NodeKind::EnumDeclaration(decl) => {
                    assert_or_warn!(
                        is_class_case(&decl.name),
                        reports,
                        decl.name.span(),
                        Warning::NonClassCaseEnumName {
                            enum_name: decl.name.clone()
                        }
                    );
                }
                NodeKind::TraitDeclaration(decl) => {
                    assert_or_warn!(
                        is_class_case(&decl.name),
                        reports,
                        decl.name.span(),
                        Warning::NonClassCaseTraitName {
                            name: decl.name.clone()
                        }
                    );
                }
                _ => {}
            }
        }
        ok((), reports)
    }
}
