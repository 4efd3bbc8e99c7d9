//! Body registry: the ordered body list and its orbit tree

use crate::body::{BodyState, CelestialBody};
use crate::error::{Result, SimError};
use std::collections::HashMap;

/// Validated, ordered collection of bodies
///
/// The orbit relationships form a tree rooted at the single parentless body,
/// whose name must equal the configured root name. Parent references are
/// resolved to indices once, at construction.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
    parents: Vec<Option<usize>>,
    index: HashMap<String, usize>,
    root: usize,
}

impl BodyRegistry {
    pub fn new(bodies: Vec<CelestialBody>, root_name: &str) -> Result<Self> {
        if bodies.is_empty() {
            return Err(SimError::Empty);
        }

        let mut index: HashMap<String, usize> = HashMap::with_capacity(bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            validate_body(body)?;
            if index.insert(body.name.clone(), i).is_some() {
                return Err(SimError::DuplicateBody(body.name.clone()));
            }
        }

        let parents = bodies
            .iter()
            .enumerate()
            .map(|(i, body)| match &body.orbits {
                None => Ok(None),
                Some(parent) => match index.get(parent.as_str()) {
                    Some(&p) if p != i => Ok(Some(p)),
                    Some(_) => Err(SimError::OrbitCycle(body.name.clone())),
                    None => Err(SimError::UnknownBody {
                        body: body.name.clone(),
                        orbits: parent.clone(),
                    }),
                },
            })
            .collect::<Result<Vec<_>>>()?;

        let root = match index.get(root_name) {
            Some(&r) if parents[r].is_none() => r,
            Some(_) => return Err(SimError::RootHasParent(root_name.to_string())),
            None => return Err(SimError::MissingRoot(root_name.to_string())),
        };

        let parentless: Vec<String> = parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| bodies[i].name.clone())
            .collect();
        if parentless.len() > 1 {
            return Err(SimError::MultipleRoots(parentless));
        }

        let registry = Self {
            bodies,
            parents,
            index,
            root,
        };

        // Every chain must reach the root within len() hops
        for i in 0..registry.len() {
            registry.chain_to_root(i)?;
        }

        log::debug!(
            "registered {} bodies rooted at `{}`",
            registry.len(),
            registry.root().name
        );
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn root_index(&self) -> usize {
        self.root
    }

    pub fn root(&self) -> &CelestialBody {
        &self.bodies[self.root]
    }

    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.parents[index]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.index_of(name).map(|i| &self.bodies[i])
    }

    pub fn body(&self, index: usize) -> &CelestialBody {
        &self.bodies[index]
    }

    pub(crate) fn body_mut(&mut self, index: usize) -> &mut CelestialBody {
        &mut self.bodies[index]
    }

    /// Number of hops from `index` to the root (0 for the root itself)
    pub fn depth(&self, index: usize) -> usize {
        // Chains are checked at construction
        self.chain_to_root(index).map(|c| c.len()).unwrap_or(0)
    }

    /// Ancestors of `index` from its parent up to and including the root
    pub(crate) fn chain_to_root(&self, index: usize) -> Result<Vec<usize>> {
        let mut chain = Vec::new();
        let mut current = index;
        while let Some(parent) = self.parents[current] {
            if chain.len() >= self.len() {
                return Err(SimError::OrbitCycle(self.bodies[index].name.clone()));
            }
            chain.push(parent);
            current = parent;
        }
        if current != self.root {
            return Err(SimError::OrbitCycle(self.bodies[index].name.clone()));
        }
        Ok(chain)
    }

    /// Copy out the kinematic state of every body, in registry order
    pub fn states(&self) -> Vec<BodyState> {
        self.bodies.iter().map(CelestialBody::state).collect()
    }

    /// Write kinematic state back, in registry order
    pub fn apply_states(&mut self, states: &[BodyState]) {
        debug_assert_eq!(states.len(), self.bodies.len());
        for (body, state) in self.bodies.iter_mut().zip(states) {
            body.set_state(state);
        }
    }
}

fn validate_body(body: &CelestialBody) -> Result<()> {
    if !(body.mass.is_finite() && body.mass > 0.0) {
        return Err(SimError::InvalidMass {
            name: body.name.clone(),
            mass: body.mass,
        });
    }
    if !(body.radius.is_finite() && body.radius > 0.0) {
        return Err(SimError::InvalidRadius {
            name: body.name.clone(),
            radius: body.radius,
        });
    }
    if !(body.eccentricity.is_finite() && body.eccentricity >= 0.0) {
        return Err(SimError::InvalidEccentricity {
            name: body.name.clone(),
            eccentricity: body.eccentricity,
        });
    }
    let fields = [
        ("inclination", body.inclination.is_finite()),
        ("axial tilt", body.axial_tilt.is_finite()),
        ("rotation period", body.rotation_period.is_finite()),
        ("position", body.position.is_finite()),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, ok)| !ok) {
        return Err(SimError::NonFinite {
            name: body.name.clone(),
            field: *field,
        });
    }
    Ok(())
}
