use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use pkmc_util::Vec3;

use crate::column::{BlockInfo, Column};
use crate::error::{ParseError, RaycastError, WriteError};
use crate::parser::parse_column;
use crate::profile::VersionProfile;
use crate::raycast::{self, Hit};

struct WorldInner {
    columns: HashMap<(i32, i32), Arc<RwLock<Column>>>,
}

/// The in-memory block store. Cheap to clone: all state lives behind the
/// inner `Arc<RwLock<..>>`, with a second lock per column so a reader of
/// one column never blocks a writer of another.
#[derive(Clone)]
pub struct World {
    profile: VersionProfile,
    inner: Arc<RwLock<WorldInner>>,
}

impl World {
    pub fn new(profile: VersionProfile) -> Self {
        Self {
            profile,
            inner: Arc::new(RwLock::new(WorldInner {
                columns: HashMap::new(),
            })),
        }
    }

    pub fn profile(&self) -> &VersionProfile {
        &self.profile
    }

    /// Decodes `buffer` into a column and installs it at `(cx, cz)`,
    /// replacing anything loaded there before. The previous column, if
    /// any, is left untouched when decoding fails.
    pub fn load_column(&self, cx: i32, cz: i32, buffer: &[u8]) -> Result<(), ParseError> {
        let column = parse_column(cx, cz, &self.profile, buffer)?;
        let mut inner = self.inner.write().unwrap();
        inner
            .columns
            .insert((cx, cz), Arc::new(RwLock::new(column)));
        Ok(())
    }

    /// Drops a loaded column. A no-op if nothing was loaded there.
    pub fn unload_column(&self, cx: i32, cz: i32) {
        let mut inner = self.inner.write().unwrap();
        inner.columns.remove(&(cx, cz));
    }

    pub fn is_column_loaded(&self, cx: i32, cz: i32) -> bool {
        let inner = self.inner.read().unwrap();
        inner.columns.contains_key(&(cx, cz))
    }

    /// Snapshot of currently loaded column coordinates, in no particular
    /// order.
    pub fn get_loaded_chunks(&self) -> Vec<(i32, i32)> {
        let inner = self.inner.read().unwrap();
        inner.columns.keys().copied().collect()
    }

    fn column_at(&self, x: i32, z: i32) -> Option<Arc<RwLock<Column>>> {
        let cx = x.div_euclid(16);
        let cz = z.div_euclid(16);
        let inner = self.inner.read().unwrap();
        inner.columns.get(&(cx, cz)).cloned()
    }

    /// Air (0) for any unloaded column or out-of-bounds `y`.
    pub fn get_block_state_id(&self, x: i32, y: i32, z: i32) -> u32 {
        match self.column_at(x, z) {
            Some(column) => column.read().unwrap().get_state_id(&self.profile, x, y, z),
            None => 0,
        }
    }

    pub fn set_block_state_id(&self, x: i32, y: i32, z: i32, state_id: u32) -> Result<(), WriteError> {
        let cx = x.div_euclid(16);
        let cz = z.div_euclid(16);
        let Some(column) = self.column_at(x, z) else {
            return Err(WriteError::NotLoaded { cx, cz });
        };
        let mut column = column.write().unwrap();
        column
            .set_state_id(&self.profile, x, y, z, state_id)
            .ok_or(WriteError::OutOfRange { y })
    }

    pub fn get_biome_id(&self, x: i32, y: i32, z: i32) -> u32 {
        match self.column_at(x, z) {
            Some(column) => column.read().unwrap().get_biome_id(&self.profile, x, y, z),
            None => 0,
        }
    }

    pub fn get_block_light(&self, x: i32, y: i32, z: i32) -> u8 {
        match self.column_at(x, z) {
            Some(column) => column.read().unwrap().get_block_light(&self.profile, x, y, z),
            None => 0,
        }
    }

    /// Full sky (15) outside loaded columns, matching an unobstructed sky
    /// above the world rather than darkness.
    pub fn get_sky_light(&self, x: i32, y: i32, z: i32) -> u8 {
        match self.column_at(x, z) {
            Some(column) => column.read().unwrap().get_sky_light(&self.profile, x, y, z),
            None => 15,
        }
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<BlockInfo> {
        self.column_at(x, z)?
            .read()
            .unwrap()
            .get_block(&self.profile, x, y, z)
    }

    pub fn export_section_states(&self, cx: i32, cz: i32, sy: usize) -> Option<[u8; 16384]> {
        let inner = self.inner.read().unwrap();
        let column = inner.columns.get(&(cx, cz))?;
        column.read().unwrap().export_section_states(sy)
    }

    pub fn raycast(
        &self,
        origin: Vec3<f64>,
        direction: Vec3<f64>,
        max_distance: f64,
        ignore: Option<&dyn Fn(u32) -> bool>,
    ) -> Result<Option<Hit>, RaycastError> {
        raycast::raycast(self, origin, direction, max_distance, ignore)
    }
}
