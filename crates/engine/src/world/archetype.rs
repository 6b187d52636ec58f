/// Opaque terrain-kind identifier. The engine stores these without
/// interpreting them; the game layer decides what each id spawns.
///
/// The only roles the engine knows about are the two configured on the
/// manager: the structural ceiling/floor archetype and the standard ore one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ArchetypeId(pub u16);

impl ArchetypeId {
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}
