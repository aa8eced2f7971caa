use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to bind the HTTP server to
    pub bind_addr: String,

    /// Path to the Haar cascade XML used for face detection
    pub cascade_path: String,

    /// Path to the trained LBPH classifier XML
    pub model_path: String,

    /// Display name reported when the enrolled identity is recognized
    pub target_name: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            env::var("FACE_GATE_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let cascade_path = env::var("FACE_GATE_CASCADE")
            .unwrap_or_else(|_| "haarcascade_frontalface_default.xml".to_string());

        let model_path =
            env::var("FACE_GATE_MODEL").unwrap_or_else(|_| "classifier.xml".to_string());

        let target_name =
            env::var("FACE_GATE_TARGET_NAME").unwrap_or_else(|_| "BAO".to_string());

        Ok(Self {
            bind_addr,
            cascade_path,
            model_path,
            target_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: env vars are process-global and tests run concurrently.
    #[test]
    fn test_from_env() {
        std::env::remove_var("FACE_GATE_ADDR");
        std::env::remove_var("FACE_GATE_CASCADE");
        std::env::remove_var("FACE_GATE_MODEL");
        std::env::remove_var("FACE_GATE_TARGET_NAME");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.cascade_path, "haarcascade_frontalface_default.xml");
        assert_eq!(config.model_path, "classifier.xml");
        assert_eq!(config.target_name, "BAO");

        std::env::set_var("FACE_GATE_ADDR", "127.0.0.1:8080");
        std::env::set_var("FACE_GATE_CASCADE", "/models/cascade.xml");
        std::env::set_var("FACE_GATE_MODEL", "/models/classifier.xml");
        std::env::set_var("FACE_GATE_TARGET_NAME", "Alice");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.cascade_path, "/models/cascade.xml");
        assert_eq!(config.model_path, "/models/classifier.xml");
        assert_eq!(config.target_name, "Alice");

        std::env::remove_var("FACE_GATE_ADDR");
        std::env::remove_var("FACE_GATE_CASCADE");
        std::env::remove_var("FACE_GATE_MODEL");
        std::env::remove_var("FACE_GATE_TARGET_NAME");
    }
}
