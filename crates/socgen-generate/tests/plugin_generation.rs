//! Workspace and project generation from a plugin laid out on disk.

use std::fs;
use std::path::Path;

use serde_json::json;
use socgen_generate::{GenerateError, Generator};
use socgen_model::parse::load_plugin;

fn write(root: &Path, path: &str, body: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn zephyr_plugin(root: &Path) {
    write(
        root,
        ".cfsplugin",
        &json!({
            "pluginId": "com.example.zephyr",
            "pluginName": "Zephyr blinky",
            "features": {
                "workspace": {
                    "files": [{ "src": "workspace/.gitignore", "dst": "./", "condition": "${context.git}" }],
                    "templates": [{ "src": "workspace/*.eta", "dst": "./" }]
                },
                "project": {
                    "files": [
                        { "src": "files/src/**/*.c", "dst": "${context.projectName}/src/" },
                        { "src": "files/boards/*.overlay", "dst": "${context.projectName}/app.overlay" }
                    ],
                    "templates": [
                        { "src": "templates/*.eta", "dst": "${context.projectName}/" },
                        {
                            "src": "templates/freertos/*.eta",
                            "dst": "${context.projectName}/rtos/",
                            "condition": "${context.rtos === 'freertos'}"
                        }
                    ]
                }
            }
        })
        .to_string(),
    );
    write(root, "workspace/.gitignore", "build/\n");
    write(root, "workspace/README.md.eta", "# {{ context.workspaceName }}\n");
    write(root, "files/src/main.c", "int main(void) { return 0; }\n");
    write(root, "files/src/drivers/led.c", "void led_on(void) {}\n");
    write(root, "files/boards/fthr.overlay", "&led0 { status = \"okay\"; };\n");
    write(root, "templates/CMakeLists.txt.eta", "project({{ context.projectName }})\n");
    write(root, "templates/prj.conf.eta", "CONFIG_BOARD=\"{{ context.board | upper }}\"\n");
    write(root, "templates/freertos/FreeRTOSConfig.h.eta", "#define configTICK_RATE_HZ 1000\n");
}

fn relative(base: &Path, paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn project_generation() {
    let plugin_dir = tempfile::tempdir().unwrap();
    zephyr_plugin(plugin_dir.path());
    let plugin = load_plugin(&plugin_dir.path().join(".cfsplugin")).unwrap();
    let out = tempfile::tempdir().unwrap();
    let context = json!({ "projectName": "blinky", "board": "fthr", "rtos": "zephyr" });

    let written = Generator::new(&plugin)
        .unwrap()
        .generate_project(out.path(), &context)
        .unwrap();

    assert_eq!(
        relative(out.path(), &written),
        [
            "blinky/src/led.c",
            "blinky/src/main.c",
            "blinky/app.overlay",
            "blinky/CMakeLists.txt",
            "blinky/prj.conf",
        ]
    );
    assert_eq!(
        fs::read_to_string(out.path().join("blinky/prj.conf")).unwrap(),
        "CONFIG_BOARD=\"FTHR\"\n"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("blinky/CMakeLists.txt")).unwrap(),
        "project(blinky)\n"
    );
    assert!(!out.path().join("blinky/rtos").exists());
}

#[test]
fn conditional_templates_follow_context() {
    let plugin_dir = tempfile::tempdir().unwrap();
    zephyr_plugin(plugin_dir.path());
    let plugin = load_plugin(&plugin_dir.path().join(".cfsplugin")).unwrap();
    let out = tempfile::tempdir().unwrap();
    let context = json!({ "projectName": "rtos-demo", "board": "fthr", "rtos": "freertos" });

    let written = Generator::new(&plugin)
        .unwrap()
        .generate_project(out.path(), &context)
        .unwrap();

    assert!(written.contains(&out.path().join("rtos-demo/rtos/FreeRTOSConfig.h")));
}

#[test]
fn workspace_condition_skips_files() {
    let plugin_dir = tempfile::tempdir().unwrap();
    zephyr_plugin(plugin_dir.path());
    let plugin = load_plugin(&plugin_dir.path().join(".cfsplugin")).unwrap();
    let out = tempfile::tempdir().unwrap();

    let written = Generator::new(&plugin)
        .unwrap()
        .generate_workspace(out.path(), &json!({ "workspaceName": "demo", "git": false }))
        .unwrap();

    assert_eq!(relative(out.path(), &written), ["README.md"]);
    assert_eq!(fs::read_to_string(&written[0]).unwrap(), "# demo\n");
}

#[test]
fn failing_template_names_the_map() {
    let plugin_dir = tempfile::tempdir().unwrap();
    zephyr_plugin(plugin_dir.path());
    write(plugin_dir.path(), "templates/broken.h.eta", "{% if %}\n");
    let plugin = load_plugin(&plugin_dir.path().join(".cfsplugin")).unwrap();
    let out = tempfile::tempdir().unwrap();

    let err = Generator::new(&plugin)
        .unwrap()
        .generate_project(out.path(), &json!({ "projectName": "blinky", "board": "fthr", "rtos": "zephyr" }))
        .unwrap_err();

    match err {
        GenerateError::Render { src, dst, .. } => {
            assert_eq!(src, "templates/*.eta");
            assert_eq!(dst, "${context.projectName}/");
        }
        other => panic!("expected a render failure, got {other:?}"),
    }
}
