use bytemuck::{
    Pod,
    Zeroable,
};
use nalgebra_glm::{
    Mat4,
    Vec1,
    Vec2,
    Vec3,
    Vec4,
};

const LOOK_AT: Vec4 = Vec4::new(0.0, 0.0, 1.0, 0.0);
const CAM_RIGHT: Vec4 = Vec4::new(1.0, 0.0, 0.0, 0.0);
const CAM_UP: Vec4 = Vec4::new(0.0, 1.0, 0.0, 0.0);

fn apply_rotation(rotation: &Vec2, look_at: &mut Vec4, cam_right: &mut Vec4, cam_up: &mut Vec4) {
    let pitch_mat = nalgebra_glm::rotate(&Mat4::identity(), rotation.y, &Vec3::new(1.0, 0.0, 0.0));
    let yaw_mat = nalgebra_glm::rotate(&Mat4::identity(), rotation.x, &Vec3::new(0.0, 1.0, 0.0));
    let rotation_mat = yaw_mat * pitch_mat;

    *look_at = nalgebra_glm::normalize(&(rotation_mat * LOOK_AT));
    *cam_right = rotation_mat * CAM_RIGHT;

    let look_at_vec3 = look_at.xyz();
    let cam_right_vec3 = cam_right.xyz();
    let cam_up_vec3 = nalgebra_glm::cross(&look_at_vec3, &cam_right_vec3);
    *cam_up = Vec4::new(cam_up_vec3.x, cam_up_vec3.y, cam_up_vec3.z, 0.0);
}

/// Frame-constant matrices shared by every shading stage (192 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct GlobalUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view_inverse: [[f32; 4]; 4],
    pub proj_inverse: [[f32; 4]; 4],
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self::from_view_proj(&Mat4::identity(), &Mat4::identity())
    }
}

impl GlobalUniforms {
    pub fn from_view_proj(view: &Mat4, proj: &Mat4) -> Self {
        Self {
            view_proj: (proj * view).into(),
            view_inverse: nalgebra_glm::inverse(view).into(),
            proj_inverse: nalgebra_glm::inverse(proj).into(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::from(self.view_proj)
    }

    pub fn view_inverse(&self) -> Mat4 {
        Mat4::from(self.view_inverse)
    }

    pub fn proj_inverse(&self) -> Mat4 {
        Mat4::from(self.proj_inverse)
    }

    /// World-space primary ray through `uv` in `[0, 1]^2` screen coordinates.
    pub fn primary_ray(&self, uv: Vec2) -> (Vec3, Vec3) {
        let d = uv * 2.0 - Vec2::new(1.0, 1.0);
        let view_inverse = self.view_inverse();
        let origin = view_inverse * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let target = self.proj_inverse() * Vec4::new(d.x, d.y, 1.0, 1.0);
        let target = nalgebra_glm::normalize(&target.xyz());
        let direction = view_inverse * Vec4::new(target.x, target.y, target.z, 0.0);
        (origin.xyz(), nalgebra_glm::normalize(&direction.xyz()))
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    look_at: Vec4,
    cam_up: Vec4,
    proj: Mat4,
}

impl Camera {
    pub fn new(width: u32, height: u32, position: Vec3, rotation: Vec2) -> Self {
        const FOV: f32 = 60.0;
        const NEAR_Z: f32 = 0.1;
        const FAR_Z: f32 = 1000.0;
        let fov_rad = nalgebra_glm::radians(&Vec1::new(FOV)).x;

        let mut proj = nalgebra_glm::perspective_fov_rh_zo(
            fov_rad,
            width as f32,
            height as f32,
            NEAR_Z,
            FAR_Z,
        );
        proj[(1, 1)] *= -1.0;

        let mut look_at = LOOK_AT;
        let mut cam_right = CAM_RIGHT;
        let mut cam_up = CAM_UP;
        apply_rotation(&rotation, &mut look_at, &mut cam_right, &mut cam_up);

        Self {
            position,
            look_at,
            cam_up,
            proj,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn create_view_matrix(&self) -> Mat4 {
        let look_at = self.look_at.xyz();
        let cam_up = self.cam_up.xyz();
        nalgebra_glm::look_at(&self.position, &(self.position + look_at), &cam_up)
    }

    pub fn create_global_uniforms(&self) -> GlobalUniforms {
        GlobalUniforms::from_view_proj(&self.create_view_matrix(), &self.proj)
    }
}
