//! Load orchestrator
//!
//! Drives one load as an explicit state machine:
//!
//! ```text
//! Idle -> Materials -> Geometry -> Done
//!                         \-> Failed   (only with retries configured)
//! ```
//!
//! The orchestrator performs no IO. [`LoadOrchestrator::start`] and
//! [`LoadOrchestrator::handle`] return the next [`FetchRequest`] for the
//! host to perform, and the host feeds the outcome back tagged with the
//! request's ticket. Events carrying any other ticket are stale and ignored.
//! [`LoadOrchestrator::run_blocking`] is a driver for hosts that can simply
//! block on a [`ByteSource`].

use std::time::Duration;

use thiserror::Error;

use super::fetch::{ByteSource, FetchError, FetchEvent, FetchKind, FetchRequest, Ticket};
use super::format::{base_directory, derive_material_url, GeometryFormat};
use super::observer::{LoadEvent, LoadObserver, ObserverRegistry};
use super::retry::RetryPolicy;
use super::session::{LoadPhase, LoadSession};
use crate::assets::geometry::GeometryDecoders;
use crate::assets::materials::{MaterialOptions, MaterialResolver, MtlParser};
use crate::assets::textures::TextureLoader;
use crate::core::config::{CameraConfig, FrameTarget, ViewerConfig};
use crate::foundation::collections::ObserverKey;
use crate::foundation::math::Vec3;
use crate::scene::{CameraRig, Scene};

const MATERIALS_LABEL: &str = "MATERIALS";

/// Orchestrator misuse
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// `start` was called on an orchestrator that already has a session
    #[error("A load is already in progress for {0}")]
    AlreadyStarted(String),
}

/// Scene and camera the orchestrator attaches results to
pub struct ViewerContext<'a> {
    /// Receives the decoded object
    pub scene: &'a mut dyn Scene,
    /// Framed once the object is attached
    pub camera: &'a mut dyn CameraRig,
}

impl<'a> ViewerContext<'a> {
    /// Bundle a scene and a camera
    pub fn new(scene: &'a mut dyn Scene, camera: &'a mut dyn CameraRig) -> Self {
        Self { scene, camera }
    }
}

/// Runs a single material + geometry load
pub struct LoadOrchestrator {
    material_options: MaterialOptions,
    camera: CameraConfig,
    retry: RetryPolicy,
    decoders: GeometryDecoders,
    resolver: MaterialResolver,
    observers: ObserverRegistry,
    session: Option<LoadSession>,
    next_ticket: u64,
}

impl LoadOrchestrator {
    /// Create an orchestrator
    ///
    /// `texture_loader` is used by the material resolver for every texture
    /// map the material library references.
    pub fn new(config: &ViewerConfig, decoders: GeometryDecoders, texture_loader: Box<dyn TextureLoader>) -> Self {
        Self {
            material_options: config.materials.clone(),
            camera: config.camera.clone(),
            retry: config.loader.geometry_retry.clone(),
            decoders,
            resolver: MaterialResolver::new(texture_loader),
            observers: ObserverRegistry::new(),
            session: None,
            next_ticket: 0,
        }
    }

    /// Register an observer for phase, progress and error events
    pub fn subscribe(&mut self, observer: Box<dyn LoadObserver>) -> ObserverKey {
        self.observers.subscribe(observer)
    }

    /// Remove an observer
    pub fn unsubscribe(&mut self, key: ObserverKey) -> bool {
        self.observers.unsubscribe(key)
    }

    /// Current phase; `Idle` before a session exists
    pub fn phase(&self) -> LoadPhase {
        self.session.as_ref().map_or(LoadPhase::Idle, |s| s.phase)
    }

    /// Whether a fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.session.as_ref().is_some_and(LoadSession::is_loading)
    }

    /// Label describing the current phase (`MATERIALS`, `OBJECTS`, ...)
    pub fn detail_label(&self) -> &'static str {
        self.session.as_ref().map_or("", |s| s.detail_label)
    }

    /// Current session
    pub fn session(&self) -> Option<&LoadSession> {
        self.session.as_ref()
    }

    /// Resolved materials, once the material library has loaded
    pub fn materials(&self) -> Option<&MaterialResolver> {
        self.session
            .as_ref()
            .filter(|s| s.materials_loaded)
            .map(|_| &self.resolver)
    }

    /// Begin loading `url_file`
    ///
    /// Returns the first fetch to perform. `Ok(None)` means the URL's format
    /// is not handled; the orchestrator then stays `Idle` and issues nothing.
    pub fn start(&mut self, url_file: &str) -> Result<Option<FetchRequest>, LoadError> {
        if let Some(session) = &self.session {
            return Err(LoadError::AlreadyStarted(session.url_file.clone()));
        }

        let Some(format) = GeometryFormat::from_url(url_file).filter(|f| self.decoders.supports(*f)) else {
            log::info!("No geometry decoder for {}, nothing to load", url_file);
            return Ok(None);
        };

        self.session = Some(LoadSession::new(url_file, format));

        if format.has_material_library() {
            let material_url = derive_material_url(url_file);
            log::info!("Loading {} with material library {}", url_file, material_url);
            if let Some(session) = self.session.as_mut() {
                session.material_url = Some(material_url.clone());
            }
            self.set_phase(LoadPhase::Materials, MATERIALS_LABEL);
            Ok(Some(self.issue(material_url, FetchKind::MaterialLibrary, Duration::ZERO)))
        } else {
            log::info!("Loading {} as {}", url_file, format);
            Ok(self.request_geometry(Duration::ZERO))
        }
    }

    /// Feed the outcome of a fetch back in
    ///
    /// Returns the next fetch to perform, if any.
    pub fn handle(&mut self, ticket: Ticket, event: FetchEvent, ctx: &mut ViewerContext<'_>) -> Option<FetchRequest> {
        let phase = {
            let session = self.session.as_ref()?;
            if session.pending != Some(ticket) {
                log::debug!("Ignoring stale fetch event for ticket {}", ticket.id());
                return None;
            }
            session.phase
        };

        match (phase, event) {
            (_, FetchEvent::Progress { loaded, total }) => {
                self.observers.notify(&LoadEvent::Progress { loaded, total });
                None
            }
            (LoadPhase::Materials, FetchEvent::Loaded(bytes)) => {
                self.on_materials_loaded(&bytes);
                self.request_geometry(Duration::ZERO)
            }
            (LoadPhase::Materials, FetchEvent::Failed(error)) => {
                self.on_materials_failed(&error);
                self.request_geometry(Duration::ZERO)
            }
            (LoadPhase::Geometry, FetchEvent::Loaded(bytes)) => {
                self.on_geometry_loaded(&bytes, ctx);
                None
            }
            (LoadPhase::Geometry, FetchEvent::Failed(error)) => self.on_geometry_failed(&error),
            (phase, _) => {
                log::warn!("Unexpected fetch completion in phase {}", phase);
                None
            }
        }
    }

    /// Abandon the outstanding fetch and drop every observer
    ///
    /// Events for the abandoned ticket are ignored afterwards.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if let Some(ticket) = session.pending.take() {
                log::info!("Cancelled load of {} (ticket {})", session.url_file, ticket.id());
            }
        }
        self.observers.clear();
    }

    /// Run a whole load against a blocking byte source
    ///
    /// Sleeps through retry backoff. Returns the phase the load ended in.
    pub fn run_blocking(
        &mut self,
        url_file: &str,
        source: &dyn ByteSource,
        ctx: &mut ViewerContext<'_>,
    ) -> Result<LoadPhase, LoadError> {
        let mut next = self.start(url_file)?;

        while let Some(request) = next {
            if !request.delay.is_zero() {
                log::debug!("Waiting {:?} before fetching {}", request.delay, request.url);
                std::thread::sleep(request.delay);
            }

            let event = match source.read_bytes(&request.url) {
                Ok(bytes) => {
                    let len = bytes.len() as u64;
                    self.handle(request.ticket, FetchEvent::Progress { loaded: len, total: Some(len) }, ctx);
                    FetchEvent::Loaded(bytes)
                }
                Err(error) => FetchEvent::Failed(error),
            };
            next = self.handle(request.ticket, event, ctx);
        }

        Ok(self.phase())
    }

    fn issue(&mut self, url: String, kind: FetchKind, delay: Duration) -> FetchRequest {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        if let Some(session) = self.session.as_mut() {
            session.pending = Some(ticket);
        }
        log::debug!("Fetching {} ({:?}, ticket {})", url, kind, ticket.id());
        FetchRequest {
            ticket,
            url,
            kind,
            delay,
        }
    }

    fn set_phase(&mut self, phase: LoadPhase, detail: &'static str) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase == phase && session.detail_label == detail {
            return;
        }
        log::info!("Load phase {} -> {} ({})", session.phase, phase, detail);
        session.phase = phase;
        session.detail_label = detail;
        self.observers.notify(&LoadEvent::PhaseChanged { phase, detail });
    }

    fn report_error(&mut self, message: String) {
        self.observers.notify(&LoadEvent::Error {
            phase: self.phase(),
            message,
        });
    }

    fn request_geometry(&mut self, delay: Duration) -> Option<FetchRequest> {
        let (url, format) = {
            let session = self.session.as_mut()?;
            session.geometry_attempts += 1;
            (session.url_file.clone(), session.format)
        };
        self.set_phase(LoadPhase::Geometry, format.detail_label());
        Some(self.issue(url, FetchKind::Geometry(format), delay))
    }

    fn on_materials_loaded(&mut self, bytes: &[u8]) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.pending = None;

        let material_url = session.material_url.clone().unwrap_or_default();
        let base_url = self
            .material_options
            .texture_path
            .clone()
            .unwrap_or_else(|| base_directory(&material_url).to_string());

        let library = MtlParser::parse(&String::from_utf8_lossy(bytes));
        self.resolver.configure(base_url, self.material_options.clone());
        self.resolver.set_materials(library);
        self.resolver.preload();
        session.materials_loaded = true;

        log::info!(
            "Loaded {} material(s) from {} ({} texture request(s))",
            self.resolver.len(),
            material_url,
            self.resolver.texture_requests()
        );
    }

    fn on_materials_failed(&mut self, error: &FetchError) {
        if let Some(session) = self.session.as_mut() {
            session.pending = None;
        }
        log::warn!("Material library unavailable, loading geometry without materials: {}", error);
        self.report_error(error.to_string());
    }

    fn on_geometry_loaded(&mut self, bytes: &[u8], ctx: &mut ViewerContext<'_>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.pending = None;

        let url = session.url_file.clone();
        let Some(decoder) = self.decoders.get(session.format) else {
            log::error!("No decoder registered for {}", session.format);
            return;
        };
        let materials = session.materials_loaded.then_some(&mut self.resolver);

        let object = match decoder.decode(bytes, &url, materials) {
            Ok(object) => object,
            Err(error) => {
                log::error!("Failed to decode {}: {}", url, error);
                self.report_error(error.to_string());
                return;
            }
        };

        let name = object.name.clone();
        let bounds_center = object.bounds().map(|b| b.center());
        ctx.scene.add(object);
        self.set_phase(LoadPhase::Done, "");
        self.frame_camera(ctx, bounds_center);
        self.observers.notify(&LoadEvent::Completed { object: name });
    }

    fn on_geometry_failed(&mut self, error: &FetchError) -> Option<FetchRequest> {
        let attempts = {
            let session = self.session.as_mut()?;
            session.pending = None;
            session.geometry_attempts
        };
        self.report_error(error.to_string());

        if let Some(delay) = self.retry.backoff(attempts) {
            log::warn!("Geometry fetch failed ({}), retry {} in {:?}", error, attempts, delay);
            return self.request_geometry(delay);
        }

        if self.retry.is_enabled() {
            log::error!("Geometry fetch failed after {} attempt(s): {}", attempts, error);
            self.set_phase(LoadPhase::Failed, "");
        } else {
            log::error!("Geometry fetch failed: {}", error);
        }
        None
    }

    fn frame_camera(&self, ctx: &mut ViewerContext<'_>, bounds_center: Option<Vec3>) {
        if let Some(position) = self.camera.initial_position {
            ctx.camera.set_position(position);
        }
        if let Some(rotation) = self.camera.initial_rotation {
            ctx.camera.set_rotation(rotation);
        }
        let target = match (self.camera.frame_target, bounds_center) {
            (FrameTarget::BoundsCenter, Some(center)) => center,
            _ => ctx.scene.center(),
        };
        ctx.camera.look_at(target);
    }
}

impl std::fmt::Debug for LoadOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadOrchestrator")
            .field("session", &self.session)
            .field("decoders", &self.decoders)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
