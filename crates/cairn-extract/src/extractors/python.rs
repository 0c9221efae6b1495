//! Python: `[]` generics from `typing`, PEP 604 unions, quoted forward refs.

use super::{LanguageProfile, StructuralExtractor};

pub static PROFILE: LanguageProfile = LanguageProfile {
    name: "python",
    extensions: &["py", "pyi"],
    emits_type_usage: true,
    generic_open: '[',
    generic_close: ']',
    transparent_wrappers: &[
        "Optional",
        "List",
        "Dict",
        "Set",
        "FrozenSet",
        "Tuple",
        "Sequence",
        "MutableSequence",
        "Mapping",
        "MutableMapping",
        "Iterable",
        "Iterator",
        "Generator",
        "AsyncIterator",
        "AsyncGenerator",
        "Awaitable",
        "Coroutine",
        "Type",
        "Final",
        "ClassVar",
        "Annotated",
        "list",
        "dict",
        "set",
        "frozenset",
        "tuple",
        "type",
    ],
    union_wrappers: &["Union"],
    null_types: &["None"],
    primitives: &[
        "int", "float", "complex", "str", "bytes", "bytearray", "bool", "object", "None", "Any",
        "list", "dict", "set", "frozenset", "tuple", "type", "Callable",
    ],
    type_modifiers: &[],
    array_suffix: false,
    quoted_forward_refs: true,
};

#[must_use]
pub const fn extractor() -> StructuralExtractor {
    StructuralExtractor::new(&PROFILE)
}
