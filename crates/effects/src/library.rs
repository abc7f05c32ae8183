use std::borrow::Cow;
use std::collections::HashSet;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{
    AddressSpace, Block, Expression, Function, GlobalVariable, Handle, Module, ShaderStage,
    Statement, TypeInner,
};
use thiserror::Error;

use crate::catalog::{Effect, UniformSchema};

/// WGSL source shared by every effect in the catalogue.
pub const EFFECTS_WGSL: &str = include_str!("../shaders/effects.wgsl");

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to parse shader library:\n{0}")]
    Parse(String),
    #[error("shader library failed validation:\n{0}")]
    Validation(String),
    #[error("shader library has no entry point named `{0}`")]
    MissingEntryPoint(String),
    #[error("entry point `{name}` is a {found:?} stage, expected {expected:?}")]
    WrongStage {
        name: String,
        expected: ShaderStage,
        found: ShaderStage,
    },
    #[error("entry point `{entry}` reads `u.{field}`, which its effect does not declare")]
    UndeclaredUniform { entry: String, field: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryPoint {
    pub name: String,
    pub stage: ShaderStage,
}

/// Entry points for one effect, checked against the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEntryPoints<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// A parsed and validated WGSL module plus its entry point table.
#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    source: Cow<'static, str>,
    module: Module,
    entry_points: Vec<EntryPoint>,
}

impl ShaderLibrary {
    /// Loads the library that ships inside the binary.
    pub fn compiled_in() -> Result<Self, LibraryError> {
        Self::from_wgsl(Cow::Borrowed(EFFECTS_WGSL))
    }

    pub fn from_wgsl(source: impl Into<Cow<'static, str>>) -> Result<Self, LibraryError> {
        let source = source.into();
        let module = naga::front::wgsl::parse_str(&source)
            .map_err(|err| LibraryError::Parse(err.emit_to_string(&source)))?;
        Validator::new(ValidationFlags::all(), Capabilities::default())
            .validate(&module)
            .map_err(|err| LibraryError::Validation(err.emit_to_string(&source)))?;

        let entry_points: Vec<EntryPoint> = module
            .entry_points
            .iter()
            .map(|entry| EntryPoint {
                name: entry.name.clone(),
                stage: entry.stage,
            })
            .collect();
        tracing::debug!(
            entry_points = entry_points.len(),
            bytes = source.len(),
            "shader library validated"
        );

        Ok(Self {
            source,
            module,
            entry_points,
        })
    }

    /// The WGSL text. Borrowed for the compiled-in library.
    pub fn source(&self) -> Cow<'static, str> {
        self.source.clone()
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn entry_point(&self, name: &str) -> Option<&EntryPoint> {
        self.entry_points.iter().find(|entry| entry.name == name)
    }

    /// Checks that both stages of `effect` exist with the right stage kind.
    pub fn resolve<'e>(&self, effect: &'e Effect) -> Result<ResolvedEntryPoints<'e>, LibraryError> {
        self.expect_stage(effect.vertex_entry, ShaderStage::Vertex)?;
        self.expect_stage(effect.fragment_entry, ShaderStage::Fragment)?;
        Ok(ResolvedEntryPoints {
            vertex: effect.vertex_entry,
            fragment: effect.fragment_entry,
        })
    }

    /// Resolves every effect up front so a broken catalogue fails at startup.
    ///
    /// Also rejects fragment entries that read a uniform field their effect
    /// does not declare, since undeclared fields are uploaded as zero.
    pub fn verify(&self, effects: &[Effect]) -> Result<(), LibraryError> {
        for effect in effects {
            self.resolve(effect)?;
            let reads = self
                .uniform_reads(effect.fragment_entry)
                .ok_or_else(|| LibraryError::MissingEntryPoint(effect.fragment_entry.to_string()))?;
            if let Some(field) = undeclared_field(effect.uniforms, reads) {
                return Err(LibraryError::UndeclaredUniform {
                    entry: effect.fragment_entry.to_string(),
                    field,
                });
            }
        }
        Ok(())
    }

    /// Fields of the `@group(0) @binding(0)` uniform block that `entry`
    /// reads, directly or through the functions it calls.
    pub fn uniform_reads(&self, entry: &str) -> Option<UniformSchema> {
        let entry = self
            .module
            .entry_points
            .iter()
            .find(|candidate| candidate.name == entry)?;
        let Some(global) = uniform_block(&self.module) else {
            return Some(UniformSchema::NONE);
        };
        let mut walker = UniformWalker {
            module: &self.module,
            global,
            members: member_names(&self.module, global),
            visited: HashSet::new(),
            reads: UniformSchema::NONE,
        };
        walker.visit(&entry.function);
        Some(walker.reads)
    }

    fn expect_stage(&self, name: &str, expected: ShaderStage) -> Result<(), LibraryError> {
        let entry = self
            .entry_point(name)
            .ok_or_else(|| LibraryError::MissingEntryPoint(name.to_string()))?;
        if entry.stage != expected {
            return Err(LibraryError::WrongStage {
                name: name.to_string(),
                expected,
                found: entry.stage,
            });
        }
        Ok(())
    }
}

fn undeclared_field(declared: UniformSchema, reads: UniformSchema) -> Option<&'static str> {
    [
        ("time", declared.time, reads.time),
        ("resolution", declared.resolution, reads.resolution),
        ("pointer", declared.pointer, reads.pointer),
    ]
    .into_iter()
    .find(|(_, declared, read)| *read && !*declared)
    .map(|(field, _, _)| field)
}

fn uniform_block(module: &Module) -> Option<Handle<GlobalVariable>> {
    module.global_variables.iter().find_map(|(handle, variable)| {
        let binding = variable.binding.as_ref()?;
        (variable.space == AddressSpace::Uniform && binding.group == 0 && binding.binding == 0)
            .then_some(handle)
    })
}

fn member_names(module: &Module, global: Handle<GlobalVariable>) -> Vec<Option<String>> {
    match &module.types[module.global_variables[global].ty].inner {
        TypeInner::Struct { members, .. } => members.iter().map(|member| member.name.clone()).collect(),
        _ => Vec::new(),
    }
}

/// Follows an entry point through its call graph and records which uniform
/// members are accessed.
struct UniformWalker<'m> {
    module: &'m Module,
    global: Handle<GlobalVariable>,
    members: Vec<Option<String>>,
    visited: HashSet<Handle<Function>>,
    reads: UniformSchema,
}

impl UniformWalker<'_> {
    fn visit(&mut self, function: &Function) {
        for (_, expression) in function.expressions.iter() {
            match *expression {
                Expression::AccessIndex { base, index } if self.is_block(function, base) => {
                    self.mark(index);
                }
                Expression::Load { pointer } if self.is_block(function, pointer) => {
                    self.reads = UniformSchema::INTERACTIVE;
                }
                _ => {}
            }
        }

        let mut callees = Vec::new();
        collect_calls(&function.body, &mut callees);
        let module = self.module;
        for callee in callees {
            if self.visited.insert(callee) {
                self.visit(&module.functions[callee]);
            }
        }
    }

    fn is_block(&self, function: &Function, expression: Handle<Expression>) -> bool {
        matches!(function.expressions[expression], Expression::GlobalVariable(handle) if handle == self.global)
    }

    fn mark(&mut self, index: u32) {
        let name = self.members.get(index as usize).and_then(Option::as_deref);
        match name {
            Some("time") => self.reads.time = true,
            Some("resolution") => self.reads.resolution = true,
            Some("pointer") => self.reads.pointer = true,
            _ => {}
        }
    }
}

fn collect_calls(block: &Block, callees: &mut Vec<Handle<Function>>) {
    for statement in block.iter() {
        match statement {
            Statement::Call { function, .. } => callees.push(*function),
            Statement::Block(inner) => collect_calls(inner, callees),
            Statement::If { accept, reject, .. } => {
                collect_calls(accept, callees);
                collect_calls(reject, callees);
            }
            Statement::Switch { cases, .. } => {
                for case in cases {
                    collect_calls(&case.body, callees);
                }
            }
            Statement::Loop {
                body, continuing, ..
            } => {
                collect_calls(body, callees);
                collect_calls(continuing, callees);
            }
            _ => {}
        }
    }
}
