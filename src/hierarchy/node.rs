/// A row of a self-referencing table that can be assembled into a tree.
///
/// `parent_id == 0` marks a root. `children` is never persisted; it is
/// filled per request by the tree builders and serialized for presentation.
pub trait HierarchyNode: Clone + Send + Sync + 'static {
    /// Entity label used in log fields and error messages (`organization`, `menu`).
    const KIND: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn parent_id(&self) -> i64;
    fn set_parent_id(&mut self, parent_id: i64);
    fn level(&self) -> i64;
    fn set_level(&mut self, level: i64);
    fn name(&self) -> &str;
    fn children(&self) -> &[Self];
    fn children_mut(&mut self) -> &mut Vec<Self>;

    /// Copies the client-editable fields of `patch` (including `parent_id`)
    /// onto `self`. `id`, `level` and `children` stay untouched.
    fn merge_editable(&mut self, patch: Self);

    fn is_root(&self) -> bool {
        self.parent_id() == 0
    }
}
