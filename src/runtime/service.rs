use std::sync::OnceLock;

use crate::constants::Constants;
use crate::engine::{Engine, EngineConfig, EngineRef, FancyEngine};
use crate::errors::{PcreError, PcreResult};
use crate::matcher::MatchRecord;
use crate::options::CompileOptions;
use crate::pattern::Pattern;
use crate::runtime::EngineOptions;

/// Entry point and initialization token.
///
/// A `Pcre` starts uninitialized; exactly one `init*` call installs its
/// engine, and every other operation before that fails with
/// [`PcreError::NotInitialized`].
#[derive(Debug, Default)]
pub struct Pcre {
    engine: OnceLock<EngineRef>,
}

impl Pcre {
    pub fn new() -> Self {
        Self {
            engine: OnceLock::new(),
        }
    }

    /// Builds a facade with the default engine already installed.
    pub fn initialized(options: EngineOptions) -> PcreResult<Self> {
        let pcre = Self::new();
        pcre.init_with(options)?;
        Ok(pcre)
    }

    pub fn init(&self) -> PcreResult<()> {
        self.init_with(EngineOptions::default())
    }

    pub fn init_with(&self, options: EngineOptions) -> PcreResult<()> {
        options.validate()?;
        let debug = options.debug;
        self.install(Box::new(FancyEngine::new(options)), debug)
    }

    /// Installs a caller-supplied engine.
    pub fn init_engine<E>(&self, engine: E) -> PcreResult<()>
    where
        E: Engine + 'static,
    {
        self.install(Box::new(engine), false)
    }

    fn install(&self, engine: Box<dyn Engine>, debug: bool) -> PcreResult<()> {
        let version = engine.version_string();
        self.engine
            .set(EngineRef::new(engine, debug))
            .map_err(|_| PcreError::AlreadyInitialized)?;
        tracing::event!(tracing::Level::TRACE, operation = "init", engine = %version);
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    fn engine(&self, operation: &'static str) -> PcreResult<&EngineRef> {
        self.engine
            .get()
            .ok_or(PcreError::NotInitialized { operation })
    }

    pub fn compile(&self, pattern: &str, options: CompileOptions) -> PcreResult<Pattern> {
        let engine = self.engine("compile")?;
        Pattern::compile(engine, pattern, options)
    }

    /// Compiles, tests and disposes in one call.
    pub fn quick_test(
        &self,
        pattern: &str,
        subject: &str,
        options: CompileOptions,
    ) -> PcreResult<bool> {
        let engine = self.engine("quick_test")?;
        let mut compiled = Pattern::compile(engine, pattern, options)?;
        let outcome = compiled.test(subject);
        let disposed = compiled.dispose();
        let matched = outcome?;
        disposed?;
        Ok(matched)
    }

    /// Compiles, executes once from offset 0 and disposes.
    pub fn quick_match<'s>(
        &self,
        pattern: &str,
        subject: &'s str,
        options: CompileOptions,
    ) -> PcreResult<Option<MatchRecord<'s>>> {
        let engine = self.engine("quick_match")?;
        let mut compiled = Pattern::compile(engine, pattern, options)?;
        let outcome = compiled.exec(subject);
        let disposed = compiled.dispose();
        let record = outcome?;
        disposed?;
        Ok(record)
    }

    /// `major * 100 + minor`.
    pub fn version(&self) -> PcreResult<u32> {
        let engine = self.engine("version")?;
        Ok(engine.lock().version().as_number())
    }

    pub fn version_string(&self) -> PcreResult<String> {
        let engine = self.engine("version_string")?;
        Ok(engine.lock().version_string())
    }

    pub fn config(&self) -> PcreResult<EngineConfig> {
        let engine = self.engine("config")?;
        Ok(engine.lock().config())
    }

    pub fn constants(&self) -> PcreResult<&'static Constants> {
        self.engine("constants")?;
        Ok(Constants::table())
    }
}
