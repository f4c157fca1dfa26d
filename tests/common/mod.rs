#![allow(dead_code)]

use {
    logging_conf::BoxMakeWriter,
    opentelemetry_proto::tonic::{
        collector::logs::v1::{
            ExportLogsServiceRequest, ExportLogsServiceResponse,
            logs_service_server::{LogsService, LogsServiceServer},
        },
        common::v1::{AnyValue, KeyValue, any_value::Value},
    },
    std::{
        io,
        net::SocketAddr,
        sync::{Arc, Mutex},
    },
    tokio::{net::TcpListener, sync::mpsc},
    tokio_stream::wrappers::TcpListenerStream,
    tonic::{Request, Response, Status, codec::CompressionEncoding, transport::Server},
};

/// In-memory sink standing in for stdout.
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn make_writer(&self) -> BoxMakeWriter {
        let buffer = self.clone();
        BoxMakeWriter::new(move || buffer.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct MockCollector {
    requests: mpsc::UnboundedSender<ExportLogsServiceRequest>,
}

#[tonic::async_trait]
impl LogsService for MockCollector {
    async fn export(
        &self,
        request: Request<ExportLogsServiceRequest>,
    ) -> Result<Response<ExportLogsServiceResponse>, Status> {
        let _ = self.requests.send(request.into_inner());
        Ok(Response::new(ExportLogsServiceResponse {
            partial_success: None,
        }))
    }
}

/// Starts an OTLP logs collector on an ephemeral port. Every export
/// request it receives is forwarded to the returned channel.
pub async fn start_collector() -> (SocketAddr, mpsc::UnboundedReceiver<ExportLogsServiceRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    let service = LogsServiceServer::new(MockCollector { requests: tx })
        .accept_compressed(CompressionEncoding::Gzip);

    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    (addr, rx)
}

/// Returns an address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

pub fn string_value(value: Option<&AnyValue>) -> Option<&str> {
    match value?.value.as_ref()? {
        Value::StringValue(s) => Some(s.as_str()),
        _ => None,
    }
}

pub fn attribute_value<'a>(attributes: &'a [KeyValue], key: &str) -> Option<&'a Value> {
    attributes
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| kv.value.as_ref()?.value.as_ref())
}

pub fn attribute<'a>(attributes: &'a [KeyValue], key: &str) -> Option<&'a str> {
    match attribute_value(attributes, key)? {
        Value::StringValue(s) => Some(s.as_str()),
        _ => None,
    }
}

pub fn int_attribute(attributes: &[KeyValue], key: &str) -> Option<i64> {
    match attribute_value(attributes, key)? {
        Value::IntValue(v) => Some(*v),
        _ => None,
    }
}
