// Damage capability shared by anything that can be hit

/// Anything that can receive a hit.
///
/// Spatial queries hand out `&mut dyn Damageable`, so a hit can be applied
/// without knowing the concrete type of what was struck.
pub trait Damageable {
    /// Apply `amount` of damage with a knockback of `impact_force`
    fn take_damage(&mut self, amount: f32, impact_force: f32);
}
