//! Template renderer
//!
//! Pure functions from bundle data to output text. The bootstrap script
//! carries the virtual-directory creation ops, the manifest metadata block
//! and the memory ceiling; the HTML shells differ only in where the
//! payload and runtime come from (sibling files vs inlined base64).

use base64::Engine as _;
use regex::Regex;
use uuid::Uuid;

use loveweb_core::{Bundle, BundleMetadata, PackagingJob, Result};

use crate::assets::{AssetCatalog, Flavor};

/// Rendered outputs for directory-tree emission.
#[derive(Debug, Clone)]
pub struct RenderedBundle {
    /// `index.html` shell referencing sibling files.
    pub html: String,
    /// `game.js` bootstrap script.
    pub bootstrap: String,
}

const BOOTSTRAP_TEMPLATE: &str = r#"var Module = typeof Module !== 'undefined' ? Module : {};

Module['INITIAL_MEMORY'] = {{memory}};
Module['arguments'] = {{arguments}};

Module['preRun'] = Module['preRun'] || [];
Module['preRun'].push(function () {
    {{create_file_paths}}

    var metadata = {{metadata}};
    Module['addRunDependency']('loveweb-bundle');
    ({{package_data}}).then(function (bytes) {
        if (bytes.length !== metadata.remote_package_size) {
            throw new Error('bundle size mismatch for ' + metadata.package_uuid);
        }
        for (var i = 0; i < metadata.files.length; i++) {
            var file = metadata.files[i];
            var parts = ('/' + file.filename).split('/');
            Module['FS_createDataFile'](
                parts.slice(0, -1).join('/') || '/',
                parts[parts.length - 1],
                bytes.subarray(Number(file.start), Number(file.end)),
                true, true, file.audio
            );
        }
        Module['removeRunDependency']('loveweb-bundle');
    });
});
"#;

const SHELL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{{title}}</title>
<style>
html, body { margin: 0; padding: 0; width: 100%; height: 100%; background: #1e1e2e; overflow: hidden; }
#container { display: flex; justify-content: center; align-items: center; width: 100%; height: 100%; }
canvas { display: block; transform-origin: center center; }
#loading { color: #cdd6f4; font-family: sans-serif; font-size: 24px; text-align: center; }
</style>
</head>
<body>
<div id="container">
<div id="loading">Loading...</div>
<canvas id="canvas" oncontextmenu="event.preventDefault()"></canvas>
</div>
<script src="game.js"></script>
<script src="love.js"></script>
<script>
Module['canvas'] = document.getElementById('canvas');
window.onerror = function (e) {
    document.getElementById('loading').innerHTML = 'Error: ' + e;
};
</script>
</body>
</html>
"#;

const SINGLE_DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{{title}}</title>
<style>
html, body { margin: 0; padding: 0; width: 100%; height: 100%; background: #1e1e2e; overflow: hidden; }
#container { display: flex; justify-content: center; align-items: center; width: 100%; height: 100%; }
canvas { display: block; transform-origin: center center; }
#loading { color: #cdd6f4; font-family: sans-serif; font-size: 24px; text-align: center; }
</style>
</head>
<body>
<div id="container">
<div id="loading">Loading...</div>
<canvas id="canvas" oncontextmenu="event.preventDefault()" style="display:none;"></canvas>
</div>
<script>
function decodeBase64(base64) {
    var binary = atob(base64);
    var bytes = new Uint8Array(binary.length);
    for (var i = 0; i < binary.length; i++) bytes[i] = binary.charCodeAt(i);
    return bytes;
}
var LOVEWEB_WASM = decodeBase64('{{wasm_base64}}');
window.onerror = function (e) {
    document.getElementById('loading').innerHTML = 'Error: ' + e;
};
var Module = {
    canvas: document.getElementById('canvas'),
    wasmBinary: LOVEWEB_WASM,
    postRun: [function () {
        document.getElementById('loading').style.display = 'none';
        var canvas = document.getElementById('canvas');
        canvas.style.display = 'block';
        canvas.focus();
        function scaleCanvas() {
            var container = document.getElementById('container');
            var scale = Math.min(
                container.clientWidth / canvas.width,
                container.clientHeight / canvas.height,
                1
            );
            canvas.style.transform = 'scale(' + scale + ')';
        }
        scaleCanvas();
        window.addEventListener('resize', scaleCanvas);
    }]
};
</script>
<script>
{{bootstrap}}
</script>
<script>
{{runtime_script}}
</script>
</body>
</html>
"#;

/// Render `index.html` + `game.js` for directory-tree emission. The
/// payload is fetched from the sibling `game.data`.
pub fn render_directory(bundle: &Bundle, job: &PackagingJob) -> Result<RenderedBundle> {
    let bootstrap = render_bootstrap(
        bundle,
        job.memory_limit,
        "fetch('game.data').then(function (r) { return r.arrayBuffer(); }).then(function (b) { return new Uint8Array(b); })",
    )?;
    let html = fill(SHELL_TEMPLATE, &[("title", &html_escape(&job.title))]);
    Ok(RenderedBundle { html, bootstrap })
}

/// Render one self-contained HTML document: payload, bootstrap and
/// runtime are all inlined so the page needs no further fetches. The
/// compat runtime flavor is used because the worker-based build cannot
/// live inside a single document.
pub async fn render_single_document(
    bundle: &Bundle,
    job: &PackagingJob,
    assets: &AssetCatalog,
) -> Result<String> {
    let payload_b64 = base64::engine::general_purpose::STANDARD.encode(&bundle.payload);
    let bootstrap = render_bootstrap(
        bundle,
        job.memory_limit,
        &format!("Promise.resolve(decodeBase64('{}'))", payload_b64),
    )?;

    // The runtime script is inlined as text; mangled bytes must fail
    // loudly, not ship a corrupted document.
    let runtime_script = String::from_utf8(assets.load(Flavor::Compat, "love.js").await?)
        .map_err(|e| anyhow::anyhow!("love.js is not valid UTF-8: {}", e))?;
    let wasm = assets.load(Flavor::Compat, "love.wasm").await?;

    Ok(fill(
        SINGLE_DOCUMENT_TEMPLATE,
        &[
            ("title", &html_escape(&job.title)),
            ("wasm_base64", &base64::engine::general_purpose::STANDARD.encode(&wasm)),
            ("bootstrap", &bootstrap),
            ("runtime_script", &runtime_script),
        ],
    ))
}

/// The bootstrap script shared by both document shapes. `package_data`
/// is a JS expression yielding a promise of the payload bytes.
fn render_bootstrap(bundle: &Bundle, memory_limit: u64, package_data: &str) -> Result<String> {
    let metadata = BundleMetadata {
        package_uuid: Uuid::new_v4().to_string(),
        remote_package_size: bundle.payload.len() as u64,
        files: &bundle.manifest,
    };

    let create_file_paths = bundle
        .create_paths
        .iter()
        .map(|op| {
            format!(
                "Module['FS_createPath']('{}', '{}', true, true);",
                js_escape(&op.parent),
                js_escape(&op.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    Ok(fill(
        BOOTSTRAP_TEMPLATE,
        &[
            ("memory", &memory_limit.to_string()),
            ("arguments", &serde_json::to_string(&bundle.arguments)?),
            ("create_file_paths", &create_file_paths),
            ("metadata", &serde_json::to_string(&metadata)?),
            ("package_data", package_data),
        ],
    ))
}

/// Substitute every `{{key}}` marker in one pass over the template.
/// Substituted regions are never re-scanned, so user data that happens
/// to contain a marker (a filename, a title) passes through verbatim.
fn fill(template: &str, replacements: &[(&str, &str)]) -> String {
    let re = Regex::new(r"\{\{(\w+)\}\}").unwrap();
    re.replace_all(template, |caps: &regex::Captures| {
        replacements
            .iter()
            .find(|(key, _)| *key == &caps[1])
            .map(|(_, value)| (*value).to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn js_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use loveweb_core::{CreatePath, FileEntry, SourceInput};

    fn sample_bundle() -> Bundle {
        Bundle {
            payload: b"hello".to_vec(),
            manifest: vec![FileEntry {
                filename: "main.lua".to_string(),
                crunched: 0,
                start: 0,
                end: 5,
                audio: false,
            }],
            create_paths: vec![CreatePath {
                parent: "/".to_string(),
                name: "assets".to_string(),
            }],
            arguments: vec!["./".to_string()],
        }
    }

    fn sample_job() -> PackagingJob {
        PackagingJob::new(SourceInput::local(".")).with_title("Space <Game>")
    }

    #[test]
    fn test_bootstrap_embeds_manifest_and_memory() {
        let rendered = render_directory(&sample_bundle(), &sample_job()).unwrap();
        assert!(rendered.bootstrap.contains("\"filename\":\"main.lua\""));
        assert!(rendered.bootstrap.contains("\"remote_package_size\":5"));
        assert!(rendered.bootstrap.contains("Module['INITIAL_MEMORY'] = 67108864;"));
        assert!(rendered
            .bootstrap
            .contains("Module['FS_createPath']('/', 'assets', true, true);"));
        assert!(rendered.bootstrap.contains("\"package_uuid\""));
    }

    #[test]
    fn test_directory_shell_references_siblings() {
        let rendered = render_directory(&sample_bundle(), &sample_job()).unwrap();
        assert!(rendered.html.contains("<script src=\"game.js\">"));
        assert!(rendered.html.contains("<script src=\"love.js\">"));
        assert!(rendered.bootstrap.contains("fetch('game.data')"));
    }

    #[test]
    fn test_title_is_escaped() {
        let rendered = render_directory(&sample_bundle(), &sample_job()).unwrap();
        assert!(rendered.html.contains("<title>Space &lt;Game&gt;</title>"));
    }

    #[tokio::test]
    async fn test_single_document_is_self_contained() {
        let dir = tempfile::tempdir().unwrap();
        let compat = dir.path().join("compat");
        std::fs::create_dir_all(&compat).unwrap();
        std::fs::write(compat.join("love.js"), b"var Love = function () {};").unwrap();
        std::fs::write(compat.join("love.wasm"), b"\x00asm").unwrap();

        let assets = AssetCatalog::new(dir.path());
        let html = render_single_document(&sample_bundle(), &sample_job(), &assets)
            .await
            .unwrap();

        // Payload and wasm inlined as base64, runtime inlined as text.
        let payload_b64 = base64::engine::general_purpose::STANDARD.encode(b"hello");
        assert!(html.contains(&payload_b64));
        assert!(html.contains("var Love = function () {};"));
        assert!(!html.contains("fetch("));
    }

    #[test]
    fn test_js_escape() {
        assert_eq!(js_escape("it's"), "it\\'s");
        assert_eq!(js_escape(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_marker_like_user_data_survives_rendering() {
        let mut bundle = sample_bundle();
        bundle.manifest[0].filename = "{{package_data}}.lua".to_string();

        let rendered = render_directory(&bundle, &sample_job()).unwrap();
        assert!(rendered
            .bootstrap
            .contains("\"filename\":\"{{package_data}}.lua\""));

        let job = sample_job().with_title("{{bootstrap}}");
        let rendered = render_directory(&bundle, &job).unwrap();
        assert!(rendered.html.contains("<title>{{bootstrap}}</title>"));
    }

    #[tokio::test]
    async fn test_single_document_rejects_non_utf8_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let compat = dir.path().join("compat");
        std::fs::create_dir_all(&compat).unwrap();
        std::fs::write(compat.join("love.js"), [0xff, 0xfe, 0x00]).unwrap();
        std::fs::write(compat.join("love.wasm"), b"\x00asm").unwrap();

        let assets = AssetCatalog::new(dir.path());
        let result = render_single_document(&sample_bundle(), &sample_job(), &assets).await;
        assert!(result.is_err());
    }
}
