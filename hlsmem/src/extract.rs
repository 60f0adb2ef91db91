//! Annotation extraction.
//!
//! An allocation is only visible to the placement analysis when the
//! front-end attached annotation metadata naming the allocated object.
//! Absence of the annotation is a filter, not a default: unannotated
//! allocations produce no report record at all.
use hlsinstr::modules::mem::MAlloca;
use log::debug;

/// The source-level name the annotation metadata gives this allocation.
///
/// Returns `None` when no annotation is attached, and also when a node is
/// attached but its first operand is not a string; a malformed annotation
/// is treated as absent rather than failing the run.
pub fn annotation_name(alloca: &MAlloca) -> Option<&str> {
    let node = alloca.annotation.as_ref()?;
    match node.leading_string() {
        Some(name) => Some(name),
        None => {
            debug!(
                "alloca {} carries annotation metadata without a leading string; ignoring it",
                alloca.dest
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlsinstr::{
        modules::{
            metadata::{MetadataNode, MetadataOperand},
            operand::{Name, Operand},
        },
        types::{TypeRegistry, primary::IType},
    };

    fn alloca_with(annotation: Option<MetadataNode>) -> MAlloca {
        let registry = TypeRegistry::new();
        MAlloca {
            dest: Name(0),
            ty: registry.search_or_insert(IType::I8.into()),
            count: Operand::literal(1u64),
            alignment: None,
            annotation,
        }
    }

    #[test]
    fn named_annotations_are_extracted() {
        let alloca = alloca_with(Some(MetadataNode::string("coeffs")));
        assert_eq!(annotation_name(&alloca), Some("coeffs"));
    }

    #[test]
    fn missing_annotations_filter_the_allocation_out() {
        let alloca = alloca_with(None);
        assert_eq!(annotation_name(&alloca), None);
    }

    #[test]
    fn malformed_annotations_count_as_absent() {
        let mut node = MetadataNode::default();
        node.operands.push(MetadataOperand::Int(42));
        assert_eq!(annotation_name(&alloca_with(Some(node))), None);

        assert_eq!(annotation_name(&alloca_with(Some(MetadataNode::default()))), None);
    }
}
