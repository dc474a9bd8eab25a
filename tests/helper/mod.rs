//! Mock download pages for integration tests

use mockito::{Mock, Server, ServerGuard};

pub const NGINX_INDEX: &str = r#"<html><body><table>
<tr><td><a href="nginx-1.9.10.tar.gz">nginx-1.9.10</a></td><td><a href="nginx-1.9.10.tar.gz.asc">pgp</a></td></tr>
<tr><td><a href="nginx-1.9.9.tar.gz">nginx-1.9.9</a></td></tr>
<tr><td><a href="nginx-1.8.1.tar.gz">nginx-1.8.1</a></td></tr>
<tr><td><a href="nginx-1.8.0.tar.gz">nginx-1.8.0</a></td></tr>
<tr><td><a href="nginx-0.5.38.tar.gz">nginx-0.5.38</a></td></tr>
<tr><td><a href="nginx-0.5.37.tar.gz">nginx-0.5.37</a></td></tr>
<tr><td><a href="nginx-1.9.9.tar.gz">nginx-1.9.9</a></td></tr>
</table></body></html>"#;

pub const OPENRESTY_INDEX: &str = r#"<html><body><ul>
<li><a href="download/openresty-1.9.7.4.tar.gz">openresty-1.9.7.4.tar.gz</a></li>
<li><a href="download/ngx_openresty-1.9.7.1.tar.gz">ngx_openresty-1.9.7.1.tar.gz</a></li>
<li><a href="download/ngx_openresty-1.7.10.2.tar.gz">ngx_openresty-1.7.10.2.tar.gz</a></li>
</ul></body></html>"#;

/// Serve both index pages, each expected to be requested `hits` times
pub async fn serve_indexes(hits: usize) -> (ServerGuard, Vec<Mock>) {
    let mut server = Server::new_async().await;

    let nginx = server
        .mock("GET", "/download/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(NGINX_INDEX)
        .expect(hits)
        .create_async()
        .await;

    let openresty = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(OPENRESTY_INDEX)
        .expect(hits)
        .create_async()
        .await;

    (server, vec![nginx, openresty])
}
