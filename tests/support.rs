// tests/support.rs
//! Test utilities — a scriptable XOR backend plus provider builders

use std::sync::{Arc, Mutex};

use rand::RngCore;

use cipher_engine::{
    AlgorithmParameters, CipherBackend, EngineError, EngineParams, Key, KeyFormat, OpMode,
    ParameterSpec, Provider, Result, Service, WrappedKeyType,
};

/// Route resolver debug output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Shared record of what happened inside backends a service produced.
#[derive(Default)]
pub struct CallLog {
    /// How many backend instances the service constructed.
    pub instances: usize,
    /// Ordered configuration events: `set_mode:CBC`, `set_padding:X`,
    /// `init:Encrypt`, `aad:4`, ...
    pub events: Vec<String>,
}

pub type SharedLog = Arc<Mutex<CallLog>>;

pub fn new_log() -> SharedLog {
    Arc::default()
}

/// What a final call should fail with, if anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum FinalFailure {
    IllegalBlockSize,
    BadPadding,
}

/// Behavior knobs for [`TestBackend`].
#[derive(Clone, Default)]
pub struct Behavior {
    pub log: Option<SharedLog>,
    /// Keyed init fails `InvalidKey`.
    pub reject_key: bool,
    /// Keyed init fails `InvalidAlgorithmParameter` when params are present.
    pub reject_params: bool,
    /// `set_mode` fails `NoSuchAlgorithm`.
    pub fail_set_mode: bool,
    /// `set_padding` fails `NoSuchPadding`.
    pub fail_set_padding: bool,
    pub final_failure: Option<FinalFailure>,
}

/// A toy XOR "cipher": enough structure to observe configuration order,
/// state, and data flow without any real cryptography.
pub struct TestBackend {
    behavior: Behavior,
    key: Vec<u8>,
    iv: Option<Vec<u8>>,
    mode: Option<String>,
    padding: Option<String>,
}

impl TestBackend {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            key: Vec::new(),
            iv: None,
            mode: None,
            padding: None,
        }
    }

    fn record(&self, event: String) {
        if let Some(log) = &self.behavior.log {
            log.lock().unwrap().events.push(event);
        }
    }

    fn xor(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}

impl CipherBackend for TestBackend {
    fn set_mode(&mut self, mode: &str) -> Result<()> {
        if self.behavior.fail_set_mode {
            return Err(EngineError::NoSuchAlgorithm(mode.to_owned()));
        }
        self.record(format!("set_mode:{mode}"));
        self.mode = Some(mode.to_owned());
        Ok(())
    }

    fn set_padding(&mut self, padding: &str) -> Result<()> {
        if self.behavior.fail_set_padding {
            return Err(EngineError::NoSuchPadding(padding.to_owned()));
        }
        self.record(format!("set_padding:{padding}"));
        self.padding = Some(padding.to_owned());
        Ok(())
    }

    fn init(
        &mut self,
        op: OpMode,
        key: &Key,
        params: &EngineParams,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        if self.behavior.reject_key {
            return Err(EngineError::InvalidKey("test backend rejects key".into()));
        }
        if self.behavior.reject_params && !matches!(params, EngineParams::None) {
            return Err(EngineError::InvalidAlgorithmParameter(
                "test backend rejects parameters".into(),
            ));
        }
        self.key = key.material().to_vec();
        self.iv = match params {
            EngineParams::None => {
                // Generate one the way a real mode would.
                let mut iv = vec![0u8; 16];
                rng.fill_bytes(&mut iv);
                Some(iv)
            }
            EngineParams::Spec(ParameterSpec::Iv(iv)) => Some(iv.clone()),
            EngineParams::Spec(ParameterSpec::IvAndTagLen { iv, .. }) => Some(iv.clone()),
            EngineParams::Spec(_) => None,
            EngineParams::Encoded(p) => Some(p.encoded.clone()),
        };
        self.record(format!("init:{op:?}"));
        Ok(())
    }

    fn update(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(self.xor(input))
    }

    fn update_aad(&mut self, aad: &[u8]) -> Result<()> {
        self.record(format!("aad:{}", aad.len()));
        Ok(())
    }

    fn do_final(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        match self.behavior.final_failure {
            Some(FinalFailure::IllegalBlockSize) => Err(EngineError::IllegalBlockSize(
                "input not a multiple of the block size".into(),
            )),
            Some(FinalFailure::BadPadding) => {
                Err(EngineError::BadPadding("padding check failed".into()))
            }
            None => Ok(self.xor(input)),
        }
    }

    fn wrap_key(&mut self, key: &Key) -> Result<Vec<u8>> {
        Ok(self.xor(key.material()))
    }

    fn unwrap_key(
        &mut self,
        wrapped: &[u8],
        algorithm: &str,
        key_type: WrappedKeyType,
    ) -> Result<Key> {
        let format = match key_type {
            WrappedKeyType::Secret => KeyFormat::Raw,
            WrappedKeyType::Private => KeyFormat::Pkcs8,
            WrappedKeyType::Public => KeyFormat::X509,
        };
        Ok(Key::new(algorithm, format, self.xor(wrapped)))
    }

    fn block_size(&self) -> usize {
        16
    }

    fn output_size(&self, input_len: usize) -> usize {
        input_len
    }

    fn iv(&self) -> Option<Vec<u8>> {
        self.iv.clone()
    }

    fn parameters(&self) -> Option<AlgorithmParameters> {
        self.iv
            .as_ref()
            .map(|iv| AlgorithmParameters::new("IV", iv.clone()))
    }
}

/// A service producing [`TestBackend`]s with the given behavior, counting
/// instantiations in the behavior's log.
pub fn test_service(name: &str, behavior: Behavior) -> Service {
    Service::new(name, move || {
        if let Some(log) = &behavior.log {
            log.lock().unwrap().instances += 1;
        }
        Box::new(TestBackend::new(behavior.clone()))
    })
}

/// Single-service provider, default behavior.
#[allow(dead_code)]
pub fn simple_provider(provider_name: &str, service_name: &str) -> Provider {
    Provider::new(provider_name, "test provider")
        .with_service(test_service(service_name, Behavior::default()))
}

#[allow(dead_code)]
pub fn aes_key() -> Key {
    Key::secret("AES", vec![7u8; 16])
}
