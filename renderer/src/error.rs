// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::context::ShaderStage;
use thiserror::Error;

/// Why a [`Shader`][`crate::Shader`] could not be created.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// A stage failed to compile. `log` is the compiler's info log.
    #[error("{stage} shader failed to compile: {log}")]
    Compile {
        /// The stage that failed.
        stage: ShaderStage,
        /// Diagnostic output of the compiler.
        log: String,
    },
    /// Both stages compiled but didn't link.
    #[error("shader program failed to link: {log}")]
    Link {
        /// Diagnostic output of the linker.
        log: String,
    },
    /// A required attribute does not exist or is not in use.
    #[error("attribute {0} does not exist or is not in use")]
    MissingAttribute(&'static str),
    /// A required uniform does not exist or is not in use.
    #[error("uniform {0} does not exist or is not in use")]
    MissingUniform(&'static str),
    /// The context couldn't allocate a shader or program object.
    #[error("could not allocate {0}")]
    Allocation(&'static str),
}

/// Errors that abort rendering before the first frame.
#[derive(Debug, Error)]
pub enum RendererError {
    /// No canvas or no WebGL support.
    #[error("{0}")]
    ContextUnavailable(String),
    /// See [`ShaderError`].
    #[error(transparent)]
    Shader(#[from] ShaderError),
    /// The context couldn't allocate a buffer.
    #[error("could not allocate {0}")]
    Allocation(&'static str),
}

/// Trims the trailing nul some drivers leave on info logs.
pub(crate) fn trim_log(log: Option<String>) -> String {
    log.unwrap_or_default()
        .trim_end_matches('\x00')
        .trim_end()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use crate::context::ShaderStage;
    use crate::error::{trim_log, RendererError, ShaderError};

    #[test]
    fn display() {
        let e = RendererError::from(ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:1: 'x' : undeclared identifier".to_owned(),
        });
        assert_eq!(
            e.to_string(),
            "fragment shader failed to compile: ERROR: 0:1: 'x' : undeclared identifier"
        );
        assert_eq!(
            ShaderError::MissingUniform("uProjectionMatrix").to_string(),
            "uniform uProjectionMatrix does not exist or is not in use"
        );
    }

    #[test]
    fn trim() {
        assert_eq!(trim_log(None), "");
        assert_eq!(trim_log(Some("bad\n\x00".to_owned())), "bad");
    }
}
