//! Connection contract for port elements
//!
//! Ports are ordinary elements carrying the `INPUT` or `OUTPUT` capability.
//! The runtime itself only consumes their generic contract, whether a port
//! currently participates in a connection, when it gates disposal.
//! Connection links are non-owning; a dropped peer reads as disconnected.

use crate::error::SceneError;

use super::{ElementHandle, ElementKind};

/// Connect `output` to `input`.
///
/// An output fans out to any number of inputs; an input accepts a single
/// upstream. Fails with a TypeMismatch-class error unless the capabilities
/// line up, a State-class error when either side is disposed, and a
/// Conflict-class error when the input is already connected.
pub fn connect(output: &ElementHandle, input: &ElementHandle) -> Result<(), SceneError> {
    for port in [output, input] {
        if port.is_disposed() {
            return Err(SceneError::Disposed { name: port.name() });
        }
    }
    if !output.is_a(ElementKind::OUTPUT) || !input.is_a(ElementKind::INPUT) {
        return Err(SceneError::InvalidConnection {
            output: output.name(),
            input: input.name(),
        });
    }
    if input.is_connected() {
        return Err(SceneError::AlreadyConnected { port: input.name() });
    }
    output.add_connection(input);
    input.add_connection(output);
    log::debug!("connected '{}' -> '{}'", output.name(), input.name());
    Ok(())
}

/// Break the connection between `output` and `input`. A pair that is not
/// connected is left untouched.
pub fn disconnect(output: &ElementHandle, input: &ElementHandle) {
    output.remove_connection(input);
    input.remove_connection(output);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn output() -> ElementHandle {
        ElementHandle::new(ElementKind::OUTPUT, "out")
    }

    fn input() -> ElementHandle {
        ElementHandle::new(ElementKind::INPUT, "in")
    }

    #[test]
    fn connect_and_disconnect() {
        let source = output();
        let sink = input();
        connect(&source, &sink).unwrap();
        assert!(source.is_connected());
        assert!(sink.is_connected());

        disconnect(&source, &sink);
        assert!(!source.is_connected());
        assert!(!sink.is_connected());
        // Disconnecting an unconnected pair is a no-op.
        disconnect(&source, &sink);
    }

    #[test]
    fn direction_is_enforced() {
        let err = connect(&input(), &input()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = connect(&output(), &output()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn inputs_take_a_single_upstream() {
        let sink = input();
        let source = output();
        connect(&source, &sink).unwrap();
        let err = connect(&output(), &sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn outputs_fan_out() {
        let source = output();
        let first = input();
        let second = input();
        connect(&source, &first).unwrap();
        connect(&source, &second).unwrap();
        assert!(source.is_connected());
    }

    #[test]
    fn disposed_ports_refuse_connections() {
        let source = output();
        let sink = input();
        sink.set_disposed(true);
        let err = connect(&source, &sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn dropped_peer_reads_as_disconnected() {
        let source = output();
        {
            let sink = input();
            connect(&source, &sink).unwrap();
            assert!(source.is_connected());
        }
        assert!(!source.is_connected());
    }
}
