//! Rover drive simulation: kinematics, resources, collision response, follow
//! camera and portal transitions, advanced once per frame by [`Simulation::tick`].
//!
//! The simulation owns the only mutable [`VehicleState`]. Renderers, HUDs and
//! audio read it through [`Simulation::vehicle`] between ticks.

pub mod camera;
pub mod collision;
pub mod kinematics;
pub mod portal;
pub mod sim;
pub mod state;
pub mod tuning;

pub use camera::FollowCamera;
pub use collision::{CollisionDetector, CollisionEvent};
pub use portal::{Portal, PortalDescriptor, PortalEvent, PortalSet, TransitionContext};
pub use sim::{SimError, Simulation, TickReport};
pub use state::{TurnIntent, VehicleState};
pub use tuning::{CameraTuning, CollisionTuning, RayFrame, SimTuning, VehicleTuning};
