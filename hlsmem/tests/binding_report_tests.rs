use std::fs;

use hlsinstr::{
    consts::{
        expr::{ConstExpr, ConstExprOp, ConstValue},
        int::IConst,
    },
    layout::DataLayout,
    modules::{
        BasicBlock, Function, Module,
        instructions::Instr,
        mem::{MAlloca, MStore},
        metadata::MetadataNode,
        operand::{Label, Name, Operand},
        terminator::Terminator,
    },
    types::{TypeRegistry, primary::IType},
};
use hlsmem::{BindingConfig, MemoryBinding, Placement, REPORT_FILE_NAME};

/// One-block function body out of the given instructions.
fn body_of(instructions: Vec<Instr>) -> Vec<BasicBlock> {
    vec![BasicBlock {
        label: Label::NIL,
        instructions,
        terminator: Terminator::Ret(None),
    }]
}

fn annotated_alloca(
    registry: &TypeRegistry,
    dest: u32,
    element: IType,
    count: Operand,
    name: &str,
) -> Instr {
    Instr::MAlloca(MAlloca {
        dest: Name(dest),
        ty: registry.search_or_insert(element.into()),
        count,
        alignment: None,
        annotation: Some(MetadataNode::string(name)),
    })
}

fn binding_records(module: &Module, registry: &TypeRegistry) -> Vec<(String, String, Placement)> {
    MemoryBinding::new(module, registry, BindingConfig::default())
        .records()
        .map(|r| (r.scope, r.name, r.placement))
        .collect()
}

#[test]
fn small_arrays_bind_internally() {
    // 32 x i8 = 256 bits, within the 512-bit budget.
    let registry = TypeRegistry::new();
    let mut f = Function::new("f");
    f.blocks = body_of(vec![annotated_alloca(
        &registry,
        0,
        IType::I8,
        Operand::literal(32u64),
        "buf",
    )]);
    let module = Module {
        functions: vec![f],
        layout: DataLayout::default(),
    };

    assert_eq!(
        binding_records(&module, &registry),
        [("f".to_string(), "buf".to_string(), Placement::Internal)]
    );
}

#[test]
fn large_arrays_bind_externally() {
    // 128 x i8 = 1024 bits, over budget.
    let registry = TypeRegistry::new();
    let mut f = Function::new("f");
    f.blocks = body_of(vec![annotated_alloca(
        &registry,
        0,
        IType::I8,
        Operand::literal(128u64),
        "buf",
    )]);
    let module = Module {
        functions: vec![f],
        layout: DataLayout::default(),
    };

    assert_eq!(
        binding_records(&module, &registry),
        [("f".to_string(), "buf".to_string(), Placement::External)]
    );
}

#[test]
fn unannotated_allocations_emit_no_record() {
    let registry = TypeRegistry::new();
    let byte = registry.search_or_insert(IType::I8.into());
    let mut f = Function::new("f");
    f.blocks = body_of(vec![Instr::MAlloca(MAlloca {
        dest: Name(0),
        ty: byte,
        count: Operand::literal(8u64),
        alignment: None,
        annotation: None,
    })]);
    let module = Module {
        functions: vec![f],
        layout: DataLayout::default(),
    };

    assert!(binding_records(&module, &registry).is_empty());
}

#[test]
fn declarations_contribute_nothing() {
    let registry = TypeRegistry::new();
    let module = Module {
        functions: vec![Function::new("external_fir")],
        layout: DataLayout::default(),
    };

    assert!(binding_records(&module, &registry).is_empty());
}

#[test]
fn records_follow_declaration_and_program_order() {
    let registry = TypeRegistry::new();

    let mut first = Function::new("first");
    first.blocks = body_of(vec![
        annotated_alloca(&registry, 0, IType::I32, Operand::literal(4u64), "taps"),
        Instr::MStore(MStore {
            addr: Operand::Reg(Name(0)),
            value: Operand::Imm(IConst::from(0u32).into()),
            alignment: None,
            volatile: false,
        }),
        annotated_alloca(&registry, 1, IType::I32, Operand::literal(64u64), "history"),
    ]);

    let mut second = Function::new("second");
    second.blocks = body_of(vec![annotated_alloca(
        &registry,
        0,
        IType::I8,
        Operand::literal(1u64),
        "state",
    )]);

    let module = Module {
        functions: vec![first, Function::new("declared_between"), second],
        layout: DataLayout::default(),
    };

    let records = binding_records(&module, &registry);
    let names: Vec<_> = records
        .iter()
        .map(|(scope, name, _)| (scope.as_str(), name.as_str()))
        .collect();
    assert_eq!(
        names,
        [("first", "taps"), ("first", "history"), ("second", "state")]
    );
    assert_eq!(records[0].2, Placement::Internal); // 128 bits
    assert_eq!(records[1].2, Placement::External); // 2048 bits
}

#[test]
fn lowered_count_expressions_classify_like_their_literal() {
    // The count operand mirrors a front-end's expansion of a dynamically
    // shaped local: mul(ptrtoint(_, 128), _). 128 x i8 exceeds the budget.
    let registry = TypeRegistry::new();
    let inner = ConstExpr::new(
        ConstExprOp::PtrToInt,
        [
            ConstValue::Const(IConst::new(IType::I64, 0u64).into()),
            ConstValue::Const(IConst::new(IType::I64, 128u64).into()),
        ],
    );
    let outer = ConstExpr::new(
        ConstExprOp::Mul,
        [
            ConstValue::from(inner),
            ConstValue::Const(IConst::new(IType::I64, 1u64).into()),
        ],
    );

    let mut f = Function::new("f");
    f.blocks = body_of(vec![annotated_alloca(
        &registry,
        0,
        IType::I8,
        Operand::Expr(outer),
        "dyn_buf",
    )]);
    let module = Module {
        functions: vec![f],
        layout: DataLayout::default(),
    };

    assert_eq!(
        binding_records(&module, &registry),
        [(
            "f".to_string(),
            "dyn_buf".to_string(),
            Placement::External
        )]
    );
}

#[test]
fn unresolvable_sizes_are_skipped_not_defaulted() {
    let registry = TypeRegistry::new();
    let mut f = Function::new("f");
    f.blocks = body_of(vec![
        annotated_alloca(&registry, 0, IType::I8, Operand::Reg(Name(9)), "runtime"),
        annotated_alloca(&registry, 1, IType::I8, Operand::literal(4u64), "fixed"),
    ]);
    let module = Module {
        functions: vec![f],
        layout: DataLayout::default(),
    };

    // The runtime-sized allocation disappears; the rest of the run is
    // unaffected.
    assert_eq!(
        binding_records(&module, &registry),
        [("f".to_string(), "fixed".to_string(), Placement::Internal)]
    );
}

#[test]
fn custom_thresholds_move_the_boundary() {
    let registry = TypeRegistry::new();
    let mut f = Function::new("f");
    f.blocks = body_of(vec![annotated_alloca(
        &registry,
        0,
        IType::I8,
        Operand::literal(32u64),
        "buf",
    )]);
    let module = Module {
        functions: vec![f],
        layout: DataLayout::default(),
    };

    let tight = BindingConfig { threshold_bits: 128 };
    let records: Vec<_> = MemoryBinding::new(&module, &registry, tight)
        .records()
        .collect();
    assert_eq!(records[0].placement, Placement::External);
}

#[test]
fn empty_modules_produce_the_bare_document() {
    let registry = TypeRegistry::new();
    let module = Module::default();

    let mut out = Vec::new();
    MemoryBinding::new(&module, &registry, BindingConfig::default())
        .write_report(&mut out)
        .expect("in-memory write");

    assert_eq!(
        String::from_utf8(out).expect("utf-8"),
        "<?xml version=\"1.0\"?>\n\
         <memory>\n\
         \x20<memory_allocation>\n\
         \x20</memory_allocation>\n\
         </memory>\n"
    );
}

#[test]
fn report_file_is_written_and_rewritten_identically() {
    let registry = TypeRegistry::new();
    let mut f = Function::new("fir");
    f.blocks = body_of(vec![
        annotated_alloca(&registry, 0, IType::I8, Operand::literal(32u64), "window"),
        annotated_alloca(&registry, 1, IType::I8, Operand::literal(128u64), "spill"),
    ]);
    let module = Module {
        functions: vec![f],
        layout: DataLayout::default(),
    };

    let dir = tempfile::tempdir().expect("temp dir");
    let binding = MemoryBinding::new(&module, &registry, BindingConfig::default());

    let path = binding.write_report_file(dir.path()).expect("first write");
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(REPORT_FILE_NAME));
    let first = fs::read_to_string(&path).expect("readable report");

    assert_eq!(
        first,
        "<?xml version=\"1.0\"?>\n\
         <memory>\n\
         \x20<memory_allocation>\n\
         \x20\x20<object scope=\"fir\" name=\"window\" is_internal=\"T\"/>\n\
         \x20\x20<object scope=\"fir\" name=\"spill\" is_internal=\"F\"/>\n\
         \x20</memory_allocation>\n\
         </memory>\n"
    );

    // A second run over the unchanged module truncates and reproduces the
    // file byte for byte.
    binding.write_report_file(dir.path()).expect("second write");
    let second = fs::read_to_string(&path).expect("readable report");
    assert_eq!(first, second);
}

#[test]
fn unwritable_destinations_surface_output_unavailable() {
    let registry = TypeRegistry::new();
    let module = Module::default();
    let binding = MemoryBinding::new(&module, &registry, BindingConfig::default());

    let err = binding
        .write_report_file("/nonexistent-report-dir")
        .expect_err("missing directory");
    assert!(matches!(
        err,
        hlsmem::ReportError::OutputUnavailable { .. }
    ));
}
