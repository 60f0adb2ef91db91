//! Pretty-print helpers for instructions, functions, and modules.
//!
//! Type names live in the [`TypeRegistry`], so everything here is a
//! `fmt(registry)` helper returning an `impl Display` rather than a plain
//! `Display` impl.
use crate::{
    modules::{Function, Module, instructions::Instr},
    types::TypeRegistry,
};

impl Instr {
    /// Build a formatting helper that renders the instruction using the
    /// supplied registry for type names.
    pub fn fmt<'a>(&'a self, registry: &'a TypeRegistry) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            instr: &'a Instr,
            registry: &'a TypeRegistry,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.instr {
                    Instr::IAdd(iadd) => write!(
                        f,
                        "{} = iadd {} {}, {}",
                        iadd.dest,
                        self.registry.fmt(iadd.ty),
                        iadd.lhs,
                        iadd.rhs
                    ),
                    Instr::ISub(isub) => write!(
                        f,
                        "{} = isub {} {}, {}",
                        isub.dest,
                        self.registry.fmt(isub.ty),
                        isub.lhs,
                        isub.rhs
                    ),
                    Instr::IMul(imul) => write!(
                        f,
                        "{} = imul {} {}, {}",
                        imul.dest,
                        self.registry.fmt(imul.ty),
                        imul.lhs,
                        imul.rhs
                    ),
                    Instr::ICmp(icmp) => write!(
                        f,
                        "{} = icmp.{} {} {}, {}",
                        icmp.dest,
                        icmp.op.to_str(),
                        self.registry.fmt(icmp.ty),
                        icmp.lhs,
                        icmp.rhs
                    ),
                    Instr::MLoad(load) => {
                        write!(f, "{} = load ", load.dest)?;
                        if load.volatile {
                            write!(f, "volatile ")?;
                        }
                        write!(f, "{}, ptr {}", self.registry.fmt(load.ty), load.addr)?;
                        if let Some(alignment) = load.alignment {
                            write!(f, ", align {}", alignment)?;
                        }
                        Ok(())
                    }
                    Instr::MStore(store) => {
                        write!(f, "store ")?;
                        if store.volatile {
                            write!(f, "volatile ")?;
                        }
                        write!(f, "{}, ptr {}", store.value, store.addr)?;
                        if let Some(alignment) = store.alignment {
                            write!(f, ", align {}", alignment)?;
                        }
                        Ok(())
                    }
                    Instr::MAlloca(alloca) => {
                        write!(
                            f,
                            "{} = alloca {}, {}",
                            alloca.dest,
                            self.registry.fmt(alloca.ty),
                            alloca.count
                        )?;
                        if let Some(alignment) = alloca.alignment {
                            write!(f, ", align {}", alignment)?;
                        }
                        if let Some(annotation) = &alloca.annotation {
                            if let Some(name) = annotation.leading_string() {
                                write!(f, ", !annotation \"{}\"", name)?;
                            }
                        }
                        Ok(())
                    }
                    Instr::MGetElementPtr(gep) => {
                        write!(
                            f,
                            "{} = getelementptr {}, {}",
                            gep.dest,
                            self.registry.fmt(gep.ty),
                            gep.base
                        )?;
                        for index in gep.indices.iter() {
                            write!(f, ", {}", index)?;
                        }
                        Ok(())
                    }
                }
            }
        }

        Fmt {
            instr: self,
            registry,
        }
    }
}

impl Function {
    /// Build a formatting helper that renders the function in textual form.
    pub fn fmt<'a>(&'a self, registry: &'a TypeRegistry) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            function: &'a Function,
            registry: &'a TypeRegistry,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let keyword = if self.function.is_declaration() {
                    "declare"
                } else {
                    "define"
                };
                write!(
                    f,
                    "{} {} {}(",
                    keyword,
                    self.function
                        .return_type
                        .map(|ty| self.registry.fmt(ty).to_string())
                        .unwrap_or_else(|| "void".to_string()),
                    self.function.name
                )?;
                for (i, (param, ty)) in self.function.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", param, self.registry.fmt(*ty))?;
                }
                write!(f, ")")?;

                if self.function.is_declaration() {
                    return writeln!(f);
                }

                writeln!(f, " {{")?;
                for block in &self.function.blocks {
                    writeln!(f, "{}:", block.label)?;
                    for instr in &block.instructions {
                        writeln!(f, "  {}", instr.fmt(self.registry))?;
                    }
                    writeln!(f, "  {}", block.terminator)?;
                }
                writeln!(f, "}}")
            }
        }

        Fmt {
            function: self,
            registry,
        }
    }
}

impl Module {
    /// Build a formatting helper that renders every function of the module.
    pub fn fmt<'a>(&'a self, registry: &'a TypeRegistry) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            module: &'a Module,
            registry: &'a TypeRegistry,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                for function in &self.module.functions {
                    writeln!(f, "{}", function.fmt(self.registry))?;
                }
                Ok(())
            }
        }

        Fmt {
            module: self,
            registry,
        }
    }
}
