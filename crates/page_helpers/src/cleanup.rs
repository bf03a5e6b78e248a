use bevy::prelude::*;

/// Despawns every entity carrying the marker `T`, children included.
pub fn despawn_marked<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
