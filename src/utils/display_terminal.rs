//! 터미널 출력 포맷팅 유틸리티
//!
//! 시작 시 서비스 레지스트리 초기화 과정을 보기 좋게 출력합니다.

const BOX_WIDTH: usize = 50;

pub fn print_banner(title: &str) {
    let border = "═".repeat(BOX_WIDTH);

    println!("╔{}╗", border);
    println!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    println!("╚{}╝", border);
}

pub fn print_phase(step: u8, label: &str) {
    println!("→ Step {}: Creating {}", step, label);
}

pub fn print_component(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

pub fn print_phase_done(step: u8, label: &str, count: usize) {
    println!("✓ Step {}: {} ready ({} items)", step, label, count);
}

pub fn print_summary(repositories: usize, services: usize) {
    println!();
    print_banner("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 Repositories: {}", repositories);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repositories + services);
    println!();
}
